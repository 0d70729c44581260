use std::{
    fmt,
    ops::Deref,
    str::FromStr,
};
use crate::{
    error::ValueError,
    text::pascal_case_to_title_case,
};
use super::*;

impl ActionType {
    /// The human readable name of the action, e.g. for use as part of a
    /// notification subject.
    pub fn description(&self) -> String {
        pascal_case_to_title_case(&format!("{self:?}"))
    }
}

impl From<ActionType> for &'static str {
    fn from(action: ActionType) -> &'static str {
        match action {
            ActionType::Publish => "publish",
            ActionType::Unpublish => "unpublish",
            ActionType::Edit => "edit",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", <&'static str>::from(*self))
    }
}

impl FromStr for ActionType {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "publish" => Ok(ActionType::Publish),
            "unpublish" => Ok(ActionType::Unpublish),
            "edit" => Ok(ActionType::Edit),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl InstanceStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, InstanceStatus::InProgress)
    }
}

impl fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&pascal_case_to_title_case(&format!("{self:?}")))
    }
}

impl TaskStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, TaskStatus::PendingApproval | TaskStatus::Awaiting)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&pascal_case_to_title_case(&format!("{self:?}")))
    }
}

impl WorkflowInstance {
    pub fn tasks(&self) -> Result<&TaskInstances, ValueError> {
        self.tasks.as_ref().ok_or(ValueError::Uninitialized)
    }

    pub fn pending_task(&self) -> Result<Option<&TaskInstance>, ValueError> {
        Ok(self.tasks()?
            .iter()
            .find(|task| task.status == TaskStatus::PendingApproval))
    }

    /// Verifies that an in-progress instance has exactly one pending
    /// task and that a terminal instance has none left outstanding.
    pub fn is_consistent(&self) -> Result<bool, ValueError> {
        let tasks = self.tasks()?;
        let pending = tasks.iter()
            .filter(|task| task.status == TaskStatus::PendingApproval)
            .count();
        let outstanding = tasks.iter()
            .filter(|task| !task.status.is_terminal())
            .count();
        Ok(match self.status {
            InstanceStatus::InProgress => pending == 1,
            _ => outstanding == 0,
        })
    }
}

impl From<Vec<TaskInstance>> for TaskInstances {
    fn from(args: Vec<TaskInstance>) -> Self {
        Self(args)
    }
}

impl<const N: usize> From<[TaskInstance; N]> for TaskInstances {
    fn from(args: [TaskInstance; N]) -> Self {
        Self(args.into())
    }
}

impl Deref for TaskInstances {
    type Target = Vec<TaskInstance>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl IntoIterator for TaskInstances {
    type Item = TaskInstance;
    type IntoIter = std::vec::IntoIter<TaskInstance>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl ChainStep {
    pub fn required(&self) -> bool {
        self.authority.may_approve()
    }
}

impl Chain {
    /// Whether no step in the chain requires approval.
    pub fn is_unattended(&self) -> bool {
        !self.0.iter().any(ChainStep::required)
    }
}

impl FromIterator<ChainStep> for Chain {
    fn from_iter<I: IntoIterator<Item = ChainStep>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl Deref for Chain {
    type Target = Vec<ChainStep>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

#[cfg(feature = "clap")]
mod clap {
    use ::clap::{
        ValueEnum,
        builder::PossibleValue,
    };
    use super::*;

    impl ValueEnum for ActionType {
        fn value_variants<'a>() -> &'a [Self] {
            &[
                ActionType::Publish,
                ActionType::Unpublish,
                ActionType::Edit,
            ]
        }

        fn to_possible_value(&self) -> Option<PossibleValue> {
            Some(PossibleValue::new(<&'static str>::from(*self)))
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use super::*;

    #[test]
    fn action_type() -> anyhow::Result<()> {
        assert_eq!(ActionType::Publish.to_string(), "publish");
        assert_eq!(ActionType::Unpublish, ActionType::from_str("Unpublish")?);
        assert_eq!(ActionType::Edit.description(), "Edit");
        assert!(ActionType::from_str("archive").is_err());
        assert_eq!(i64::from(ActionType::Unpublish), 2);
        assert_eq!(ActionType::try_from(3)?, ActionType::Edit);
        assert!(ActionType::try_from(0).is_err());
        Ok(())
    }

    #[test]
    fn status_display() {
        assert_eq!(InstanceStatus::InProgress.to_string(), "In Progress");
        assert_eq!(TaskStatus::PendingApproval.to_string(), "Pending Approval");
        assert_eq!(TaskStatus::NotRequired.to_string(), "Not Required");
        assert_eq!(TaskStatus::Approved.to_string(), "Approved");
    }

    #[test]
    fn status_codes() -> anyhow::Result<()> {
        assert_eq!(i64::from(TaskStatus::PendingApproval), 1);
        assert_eq!(TaskStatus::try_from(5)?, TaskStatus::NotRequired);
        assert!(TaskStatus::try_from(42).is_err());
        assert_eq!(InstanceStatus::try_from(4)?, InstanceStatus::Cancelled);
        Ok(())
    }

    #[test]
    fn terminal() {
        assert!(!TaskStatus::PendingApproval.is_terminal());
        assert!(!TaskStatus::Awaiting.is_terminal());
        assert!(TaskStatus::NotRequired.is_terminal());
        assert!(TaskStatus::Cancelled.is_terminal());
        assert!(!InstanceStatus::InProgress.is_terminal());
        assert!(InstanceStatus::Rejected.is_terminal());
    }

    #[test]
    fn chain() {
        let chain: Chain = [
            ChainStep { group_id: 1, authority: Authority::Review },
            ChainStep { group_id: 2, authority: Authority::None },
        ].into_iter().collect();
        assert!(chain.is_unattended());
        let chain: Chain = [
            ChainStep { group_id: 1, authority: Authority::Review },
            ChainStep { group_id: 2, authority: Authority::Admin },
        ].into_iter().collect();
        assert!(!chain.is_unattended());
        assert_eq!(chain.len(), 2);
    }
}
