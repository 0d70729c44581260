use enumset::EnumSetType;
use serde::{Deserialize, Serialize};

mod impls;

/// The operations an actor may apply to a workflow instance.
#[derive(Debug, EnumSetType, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    Approve,
    Reject,
    Cancel,
}

/// The decision an approver records against a pending task.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Reject,
}
