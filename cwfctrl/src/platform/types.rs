use cwfcore::{
    clock::Clock,
    event::Notifier,
    platform::WorkflowPlatform,
    workflow::machine::EmptyChainPolicy,
};
use cwfrbac::{
    Gate,
    ResolverCache,
};
use std::sync::Arc;

/// Behaviour of the engine that is decided by configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub empty_chain: EmptyChainPolicy,
    pub reject_comment_required: bool,
    pub cancel_comment_required: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            empty_chain: EmptyChainPolicy::default(),
            reject_comment_required: true,
            cancel_comment_required: true,
        }
    }
}

/// The workflow engine.
///
/// Cloning is cheap and every clone shares the same store, cache and
/// notifier, so a clone may be handed to each concurrent request.
#[derive(Clone)]
pub struct Platform {
    pub db: Arc<dyn WorkflowPlatform>,
    pub(crate) gate: Gate,
    pub(crate) cache: Arc<ResolverCache>,
    pub(crate) notifier: Arc<dyn Notifier>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) settings: Settings,
}
