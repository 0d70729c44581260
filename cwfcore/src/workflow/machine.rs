//! Planning of workflow state changes.
//!
//! The functions here are pure: they inspect a loaded instance and
//! produce the complete set of conditional writes that a transition
//! requires, along with the events to raise once those writes are
//! committed.  Nothing is applied here; the store is responsible for
//! applying a `Changeset` atomically, verifying every `from` status as
//! it goes.

use serde::{Deserialize, Serialize};
use crate::{
    error::{
        TransitionError,
        ValueError,
    },
    event::{
        EventKind,
        WorkflowEvent,
    },
};
use super::*;

/// What to do with a submission for which no step requires approval.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
pub enum EmptyChainPolicy {
    #[default]
    AutoApprove,
    Refuse,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct TaskChange {
    pub task_id: i64,
    pub from: TaskStatus,
    pub to: TaskStatus,
    pub actioned_by: Option<i64>,
    pub comment: Option<String>,
    pub completed_ts: Option<i64>,
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct InstanceChange {
    pub instance_id: i64,
    pub from: InstanceStatus,
    pub to: InstanceStatus,
    pub completed_ts: Option<i64>,
}

/// The writes a single transition is made of.  The first task change
/// is the one the transition was requested against.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Changeset {
    pub instance_id: i64,
    pub tasks: Vec<TaskChange>,
    pub instance: Option<InstanceChange>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Outcome {
    pub changeset: Changeset,
    pub events: Vec<WorkflowEvent>,
    /// The status of the instance once the changeset is applied.
    pub status: InstanceStatus,
}

impl std::fmt::Display for EmptyChainPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            EmptyChainPolicy::AutoApprove => "auto-approve",
            EmptyChainPolicy::Refuse => "refuse",
        })
    }
}

impl std::str::FromStr for EmptyChainPolicy {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_ref() {
            "autoapprove" => Ok(EmptyChainPolicy::AutoApprove),
            "refuse" => Ok(EmptyChainPolicy::Refuse),
            _ => Err(ValueError::Unsupported(s.to_string())),
        }
    }
}

fn ensure_in_progress(instance: &WorkflowInstance) -> Result<(), TransitionError> {
    if instance.status.is_terminal() {
        Err(TransitionError::InstanceTerminal {
            instance_id: instance.id,
            status: instance.status,
        })
    } else {
        Ok(())
    }
}

fn cancel_outstanding<'a>(
    tasks: impl Iterator<Item = &'a TaskInstance> + 'a,
    now: i64,
) -> impl Iterator<Item = TaskChange> + 'a {
    tasks
        .filter(|task| !task.status.is_terminal())
        .map(move |task| TaskChange {
            task_id: task.id,
            from: task.status,
            to: TaskStatus::Cancelled,
            actioned_by: None,
            comment: None,
            completed_ts: Some(now),
        })
}

/// Builds the task chain for a new submission.
///
/// Every step whose group may approve is required; the first of those
/// becomes the pending step and the rest wait their turn.  Steps whose
/// group lacks the authority are terminal as `NotRequired` from the
/// outset.  A chain without any required step is either approved on
/// the spot or refused, as dictated by the policy.
pub fn plan_submission(
    resource_id: i64,
    action: ActionType,
    submitted_by: i64,
    comment: Option<String>,
    chain: &Chain,
    policy: EmptyChainPolicy,
    now: i64,
) -> Result<NewWorkflowInstance, TransitionError> {
    if chain.is_unattended() && policy == EmptyChainPolicy::Refuse {
        return Err(TransitionError::NoApprover { resource_id });
    }
    let mut activated = false;
    let tasks = chain.iter()
        .enumerate()
        .map(|(index, step)| {
            let status = match (step.required(), activated) {
                (false, _) => TaskStatus::NotRequired,
                (true, false) => {
                    activated = true;
                    TaskStatus::PendingApproval
                }
                (true, true) => TaskStatus::Awaiting,
            };
            NewTaskInstance {
                step_index: index as i64,
                group_id: step.group_id,
                status,
                completed_ts: status.is_terminal().then_some(now),
            }
        })
        .collect::<Vec<_>>();
    let (status, completed_ts) = if activated {
        (InstanceStatus::InProgress, None)
    } else {
        (InstanceStatus::Approved, Some(now))
    };
    Ok(NewWorkflowInstance {
        resource_id,
        action,
        status,
        submitted_by,
        comment,
        created_ts: now,
        completed_ts,
        tasks,
    })
}

/// The event to raise once a submission has been stored under the
/// given id.
pub fn submission_event(id: i64, instance: &NewWorkflowInstance) -> WorkflowEvent {
    WorkflowEvent {
        kind: match instance.status {
            InstanceStatus::Approved => EventKind::InstanceApproved,
            _ => EventKind::InstanceSubmitted,
        },
        instance_id: id,
        task_id: None,
        resource_id: instance.resource_id,
        action: instance.action,
        actor_id: instance.submitted_by,
        group_id: None,
        comment: instance.comment.clone(),
        ts: instance.created_ts,
    }
}

/// Plans an approval or rejection of a pending task.
///
/// Approval activates the next awaiting step, or completes the instance
/// as approved when none remain.  Rejection completes the instance as
/// rejected and cancels every step that has yet to finish.
///
/// The decision itself raises one task event; a decision that also
/// completes the instance raises the instance event after it.
pub fn plan_decision(
    instance: &WorkflowInstance,
    task_id: i64,
    actor_id: i64,
    decision: Decision,
    comment: Option<String>,
    now: i64,
) -> Result<Outcome, TransitionError> {
    ensure_in_progress(instance)?;
    let tasks = instance.tasks()?;
    let task = tasks.iter()
        .find(|task| task.id == task_id)
        .ok_or(TransitionError::UnknownTask {
            instance_id: instance.id,
            task_id,
        })?;
    let target = decision.task_status();
    if !task.status.can_transition_to(target) {
        return Err(TransitionError::TaskNotPending {
            task_id,
            status: task.status,
        });
    }

    let mut changes = vec![TaskChange {
        task_id,
        from: task.status,
        to: target,
        actioned_by: Some(actor_id),
        comment: comment.clone(),
        completed_ts: Some(now),
    }];
    let mut events = vec![WorkflowEvent::for_task(
        match decision {
            Decision::Approve => EventKind::TaskApproved,
            Decision::Reject => EventKind::TaskRejected,
        },
        instance,
        task,
        actor_id,
        comment.clone(),
        now,
    )];
    let others = || tasks.iter().filter(move |other| other.id != task_id);

    let status = match decision {
        Decision::Approve => {
            let next = others()
                .filter(|other| other.status == TaskStatus::Awaiting)
                .min_by_key(|other| other.step_index);
            match next {
                Some(next) => {
                    changes.push(TaskChange {
                        task_id: next.id,
                        from: TaskStatus::Awaiting,
                        to: TaskStatus::PendingApproval,
                        actioned_by: None,
                        comment: None,
                        completed_ts: None,
                    });
                    InstanceStatus::InProgress
                }
                None => InstanceStatus::Approved,
            }
        }
        Decision::Reject => {
            changes.extend(cancel_outstanding(others(), now));
            InstanceStatus::Rejected
        }
    };

    let instance_change = (status != instance.status).then(|| {
        events.push(WorkflowEvent::for_instance(
            match status {
                InstanceStatus::Rejected => EventKind::InstanceRejected,
                _ => EventKind::InstanceApproved,
            },
            instance,
            actor_id,
            comment,
            now,
        ));
        InstanceChange {
            instance_id: instance.id,
            from: instance.status,
            to: status,
            completed_ts: Some(now),
        }
    });

    Ok(Outcome {
        changeset: Changeset {
            instance_id: instance.id,
            tasks: changes,
            instance: instance_change,
        },
        events,
        status,
    })
}

/// Plans the cancellation of an in-progress instance along with every
/// step that has yet to finish.
///
/// The step that was pending records who cancelled it and why; steps
/// still awaiting their turn are cancelled without attribution.
pub fn plan_cancel(
    instance: &WorkflowInstance,
    actor_id: i64,
    comment: Option<String>,
    now: i64,
) -> Result<Outcome, TransitionError> {
    ensure_in_progress(instance)?;
    let tasks = cancel_outstanding(instance.tasks()?.iter(), now)
        .map(|change| match change.from {
            TaskStatus::PendingApproval => TaskChange {
                actioned_by: Some(actor_id),
                comment: comment.clone(),
                ..change
            },
            _ => change,
        })
        .collect::<Vec<_>>();
    Ok(Outcome {
        changeset: Changeset {
            instance_id: instance.id,
            tasks,
            instance: Some(InstanceChange {
                instance_id: instance.id,
                from: instance.status,
                to: InstanceStatus::Cancelled,
                completed_ts: Some(now),
            }),
        },
        events: vec![WorkflowEvent::for_instance(
            EventKind::InstanceCancelled,
            instance,
            actor_id,
            comment,
            now,
        )],
        status: InstanceStatus::Cancelled,
    })
}

impl Changeset {
    /// Applies the changeset to an in-memory copy of the instance,
    /// checking each expected status along the way.
    pub fn apply(
        &self,
        instance: &mut WorkflowInstance,
    ) -> Result<(), TransitionError> {
        let instance_id = instance.id;
        let tasks = instance.tasks.as_mut().ok_or(ValueError::Uninitialized)?;
        for change in self.tasks.iter() {
            let task = tasks.0.iter_mut()
                .find(|task| task.id == change.task_id)
                .ok_or(TransitionError::UnknownTask {
                    instance_id,
                    task_id: change.task_id,
                })?;
            if task.status != change.from {
                return Err(TransitionError::TaskNotPending {
                    task_id: task.id,
                    status: task.status,
                });
            }
            task.status = change.to;
            if change.actioned_by.is_some() {
                task.actioned_by = change.actioned_by;
                task.comment = change.comment.clone();
            }
            task.completed_ts = change.completed_ts;
        }
        if let Some(change) = &self.instance {
            if instance.status != change.from {
                return Err(TransitionError::InstanceTerminal {
                    instance_id,
                    status: instance.status,
                });
            }
            instance.status = change.to;
            instance.completed_ts = change.completed_ts;
        }
        Ok(())
    }
}
