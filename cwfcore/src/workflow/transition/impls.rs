use std::{
    fmt,
    str::FromStr,
};
use crate::{
    error::ValueError,
    workflow::{
        InstanceStatus,
        TaskStatus,
    },
};
use super::*;

impl From<Transition> for &'static str {
    fn from(transition: Transition) -> &'static str {
        match transition {
            Transition::Approve => "approve",
            Transition::Reject => "reject",
            Transition::Cancel => "cancel",
        }
    }
}

impl fmt::Display for Transition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", <&'static str>::from(*self))
    }
}

impl From<Decision> for Transition {
    fn from(decision: Decision) -> Self {
        match decision {
            Decision::Approve => Transition::Approve,
            Decision::Reject => Transition::Reject,
        }
    }
}

impl Decision {
    /// The status the acted upon task takes on.
    pub fn task_status(&self) -> TaskStatus {
        match self {
            Decision::Approve => TaskStatus::Approved,
            Decision::Reject => TaskStatus::Rejected,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", <&'static str>::from(Transition::from(*self)))
    }
}

impl FromStr for Decision {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_ref() {
            "approve" => Ok(Decision::Approve),
            "reject" => Ok(Decision::Reject),
            s => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

impl TaskStatus {
    /// Whether a task may move from this status to the target status.
    pub fn can_transition_to(&self, target: TaskStatus) -> bool {
        use TaskStatus::*;
        matches!(
            (self, target),
            (PendingApproval, Approved)
                | (PendingApproval, Rejected)
                | (PendingApproval, Cancelled)
                | (Awaiting, PendingApproval)
                | (Awaiting, Cancelled)
        )
    }
}

impl InstanceStatus {
    pub fn can_transition_to(&self, target: InstanceStatus) -> bool {
        *self == InstanceStatus::InProgress && target != InstanceStatus::InProgress
    }
}

#[cfg(feature = "clap")]
mod clap {
    use ::clap::{
        ValueEnum,
        builder::PossibleValue,
    };
    use super::*;

    impl ValueEnum for Decision {
        fn value_variants<'a>() -> &'a [Self] {
            &[
                Decision::Approve,
                Decision::Reject,
            ]
        }

        fn to_possible_value(&self) -> Option<PossibleValue> {
            match self {
                Decision::Approve => Some(PossibleValue::new("approve")),
                Decision::Reject => Some(PossibleValue::new("reject")),
            }
        }
    }
}

#[cfg(test)]
mod test {
    use std::str::FromStr;
    use enumset::EnumSet;
    use super::*;

    #[test]
    fn smoke() -> anyhow::Result<()> {
        assert_eq!(Decision::from_str("APPROVE")?, Decision::Approve);
        assert_eq!(Decision::Reject.to_string(), "reject");
        assert_eq!(Transition::from(Decision::Reject), Transition::Reject);
        assert_eq!(Transition::Cancel.to_string(), "cancel");
        assert_eq!(
            Decision::from_str("cancel"),
            Err(ValueError::Unsupported("cancel".to_string())),
        );
        Ok(())
    }

    #[test]
    fn set() {
        let set = Transition::Approve | Transition::Reject;
        assert!(set.contains(Transition::from(Decision::Approve)));
        assert!(!set.contains(Transition::Cancel));
        assert_eq!(EnumSet::<Transition>::all().len(), 3);
    }

    #[test]
    fn task_transitions() {
        use TaskStatus::*;
        let all = [PendingApproval, Approved, Rejected, Cancelled, NotRequired, Awaiting];
        let legal = all.iter()
            .flat_map(|from| all.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .collect::<Vec<_>>();
        assert_eq!(legal, [
            (PendingApproval, Approved),
            (PendingApproval, Rejected),
            (PendingApproval, Cancelled),
            (Awaiting, PendingApproval),
            (Awaiting, Cancelled),
        ]);
    }

    #[test]
    fn instance_transitions() {
        use InstanceStatus::*;
        assert!(InProgress.can_transition_to(Approved));
        assert!(InProgress.can_transition_to(Rejected));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!InProgress.can_transition_to(InProgress));
        assert!(!Approved.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(InProgress));
    }
}
