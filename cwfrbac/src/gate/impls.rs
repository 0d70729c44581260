use cwfcore::workflow::{
    TaskInstance,
    Transition,
    WorkflowInstance,
};
use enumset::EnumSet;
use crate::error::Denial;
use super::*;

impl Gate {
    pub fn is_admin(&self, user: &User) -> bool {
        user.is_type_of(&self.admin_user_types)
    }

    pub fn actor(&self, user: User, group_ids: Vec<i64>) -> Actor {
        let is_admin = self.is_admin(&user);
        Actor { user, group_ids, is_admin }
    }

    /// Whether the actor is exempt from group membership and submitter
    /// checks.
    pub fn overrides(&self, actor: &Actor) -> bool {
        self.admin_override && actor.is_admin
    }

    /// Authorizes a transition for the actor.  Approval and rejection
    /// are checked against the task, cancellation against the instance.
    pub fn authorize(
        &self,
        actor: &Actor,
        instance: &WorkflowInstance,
        task: Option<&TaskInstance>,
        transition: Transition,
    ) -> Result<(), Denial> {
        let overridden = self.overrides(actor);
        let result = match transition {
            Transition::Approve | Transition::Reject => {
                let task = task.ok_or(Denial::TaskRequired { transition })?;
                if overridden || actor.group_ids.contains(&task.group_id) {
                    Ok(())
                } else {
                    Err(Denial::NotGroupMember {
                        user_id: actor.user.id,
                        group_id: task.group_id,
                    })
                }
            }
            Transition::Cancel => {
                if overridden || actor.user.id == instance.submitted_by {
                    Ok(())
                } else {
                    Err(Denial::NotSubmitter {
                        user_id: actor.user.id,
                        instance_id: instance.id,
                    })
                }
            }
        };
        match &result {
            Ok(()) => log::trace!(
                "user {} permitted to {transition} on instance {}",
                actor.user.id,
                instance.id,
            ),
            Err(denial) => log::info!("denied: {denial}"),
        }
        result
    }

    /// The transitions the actor would be permitted to apply, without
    /// regard to the current state of the instance or task.
    pub fn permitted(
        &self,
        actor: &Actor,
        instance: &WorkflowInstance,
        task: Option<&TaskInstance>,
    ) -> EnumSet<Transition> {
        EnumSet::<Transition>::all()
            .iter()
            .filter(|transition| {
                self.authorize(actor, instance, task, *transition).is_ok()
            })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use cwfcore::workflow::{
        ActionType,
        InstanceStatus,
        TaskStatus,
    };
    use crate::Builder;
    use super::*;

    fn user(id: i64, user_type: &str) -> User {
        User {
            id,
            name: format!("user{id}"),
            email: None,
            user_type: user_type.to_string(),
            created_ts: 0,
        }
    }

    fn instance() -> WorkflowInstance {
        WorkflowInstance {
            id: 1,
            resource_id: 2,
            action: ActionType::Publish,
            status: InstanceStatus::InProgress,
            submitted_by: 100,
            comment: None,
            created_ts: 0,
            completed_ts: None,
            tasks: None,
        }
    }

    fn task() -> TaskInstance {
        TaskInstance {
            id: 3,
            workflow_instance_id: 1,
            step_index: 0,
            group_id: 10,
            status: TaskStatus::PendingApproval,
            actioned_by: None,
            created_ts: 0,
            completed_ts: None,
            comment: None,
        }
    }

    #[test]
    fn member() -> anyhow::Result<()> {
        let gate = Builder::new().build()?;
        let actor = gate.actor(user(200, "editor"), vec![10, 11]);
        assert!(!actor.is_admin);
        gate.authorize(&actor, &instance(), Some(&task()), Transition::Approve)?;
        gate.authorize(&actor, &instance(), Some(&task()), Transition::Reject)?;
        assert_eq!(
            gate.authorize(&actor, &instance(), None, Transition::Cancel),
            Err(Denial::NotSubmitter { user_id: 200, instance_id: 1 }),
        );
        assert_eq!(
            gate.authorize(&actor, &instance(), None, Transition::Approve),
            Err(Denial::TaskRequired { transition: Transition::Approve }),
        );
        assert_eq!(
            gate.permitted(&actor, &instance(), Some(&task())),
            Transition::Approve | Transition::Reject,
        );
        Ok(())
    }

    #[test]
    fn non_member() -> anyhow::Result<()> {
        let gate = Builder::new().build()?;
        let actor = gate.actor(user(201, "editor"), vec![11]);
        assert_eq!(
            gate.authorize(&actor, &instance(), Some(&task()), Transition::Approve),
            Err(Denial::NotGroupMember { user_id: 201, group_id: 10 }),
        );
        assert!(gate.permitted(&actor, &instance(), Some(&task())).is_empty());
        Ok(())
    }

    #[test]
    fn submitter() -> anyhow::Result<()> {
        let gate = Builder::new().build()?;
        let actor = gate.actor(user(100, "writer"), vec![]);
        gate.authorize(&actor, &instance(), None, Transition::Cancel)?;
        assert_eq!(
            gate.permitted(&actor, &instance(), Some(&task())),
            EnumSet::only(Transition::Cancel),
        );
        Ok(())
    }

    #[test]
    fn admin() -> anyhow::Result<()> {
        let gate = Builder::new().build()?;
        for user_type in ["admin", "siteadmin"] {
            let actor = gate.actor(user(1, user_type), vec![]);
            assert!(actor.is_admin);
            assert_eq!(
                gate.permitted(&actor, &instance(), Some(&task())),
                EnumSet::all(),
            );
        }

        let gate = Builder::new()
            .admin_user_types(["superuser"])
            .build()?;
        assert!(!gate.actor(user(1, "admin"), vec![]).is_admin);
        assert!(gate.actor(user(1, "superuser"), vec![]).is_admin);

        let gate = Builder::new()
            .admin_override(false)
            .build()?;
        let actor = gate.actor(user(1, "admin"), vec![]);
        assert!(actor.is_admin);
        assert!(gate.permitted(&actor, &instance(), Some(&task())).is_empty());
        Ok(())
    }
}
