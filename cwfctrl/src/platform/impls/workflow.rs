use cwfcore::{
    ac::{
        group::Group,
        traits::{
            GroupBackend,
            UserBackend,
        },
        user::User,
    },
    summary::{
        Directory,
        process_list,
        process_summary,
    },
    workflow::{
        ActionType,
        Decision,
        InstanceStatus,
        TaskInstances,
        Transition,
        WorkflowInstance,
        machine::{
            Outcome,
            plan_cancel,
            plan_decision,
            plan_submission,
            submission_event,
        },
        traits::WorkflowBackend,
    },
};

use crate::{
    error::Error,
    notify::dispatch,
    platform::Platform,
};
use super::normalize_comment;

impl Platform {
    /// Submits the action on the resource for approval, returning the
    /// id of the new workflow instance.
    ///
    /// The chain of steps is built from the candidate groups configured
    /// for the action, each resolved against the resource.  A chain
    /// without any group that may approve is dealt with according to
    /// the empty chain policy.
    pub async fn submit_action(
        &self,
        resource_id: i64,
        action: ActionType,
        submitter_id: i64,
        comment: Option<&str>,
    ) -> Result<i64, Error> {
        let comment = normalize_comment(comment);
        let ancestry = self.get_ancestry(resource_id).await?;
        self.get_user(submitter_id).await?;
        let chain = self.build_chain_for(&ancestry, action).await?;
        let instance = plan_submission(
            resource_id,
            action,
            submitter_id,
            comment,
            &chain,
            self.settings.empty_chain,
            self.now(),
        )?;
        let id = self.db.insert_instance(&instance).await
            .map_err(|e| match Error::from(e) {
                Error::InvalidState(_) => Error::InvalidState(format!(
                    "resource {resource_id} already has a workflow in progress"
                )),
                e => e,
            })?;
        log::info!(
            "user {submitter_id} submitted {action} on resource {resource_id} \
            as workflow instance {id} ({})",
            instance.status,
        );
        dispatch(self.notifier.as_ref(), &[submission_event(id, &instance)]).await;
        Ok(id)
    }

    /// Approves or rejects the task on behalf of the actor, returning
    /// the status of the workflow instance afterwards.
    pub async fn act_on_task(
        &self,
        task_id: i64,
        actor_id: i64,
        decision: Decision,
        comment: Option<&str>,
    ) -> Result<InstanceStatus, Error> {
        let task = self.db.get_task(task_id).await?
            .ok_or_else(|| Error::NotFound(format!("task {task_id}")))?;
        let instance = self.get_instance(task.workflow_instance_id).await?;
        let actor = self.actor(actor_id).await?;
        self.gate.authorize(&actor, &instance, Some(&task), decision.into())?;
        let comment = self.require_comment(
            decision == Decision::Reject && self.settings.reject_comment_required,
            comment,
            "reject",
        )?;
        let outcome = plan_decision(
            &instance,
            task_id,
            actor_id,
            decision,
            comment,
            self.now(),
        )?;
        self.commit(outcome).await
    }

    /// Cancels the workflow instance on behalf of the actor.
    pub async fn cancel_instance(
        &self,
        instance_id: i64,
        actor_id: i64,
        comment: Option<&str>,
    ) -> Result<InstanceStatus, Error> {
        let instance = self.get_instance(instance_id).await?;
        let actor = self.actor(actor_id).await?;
        self.gate.authorize(&actor, &instance, None, Transition::Cancel)?;
        let comment = self.require_comment(
            self.settings.cancel_comment_required,
            comment,
            "cancel",
        )?;
        let outcome = plan_cancel(&instance, actor_id, comment, self.now())?;
        self.commit(outcome).await
    }

    async fn commit(&self, outcome: Outcome) -> Result<InstanceStatus, Error> {
        let instance_id = outcome.changeset.instance_id;
        self.db.commit_changeset(&outcome.changeset).await
            .map_err(|e| match Error::from(e) {
                Error::InvalidState(msg) => Error::InvalidState(format!(
                    "workflow instance {instance_id} was modified concurrently: {msg}"
                )),
                e => e,
            })?;
        log::info!("workflow instance {instance_id} is now {}", outcome.status);
        dispatch(self.notifier.as_ref(), &outcome.events).await;
        Ok(outcome.status)
    }

    /// The tasks the user may act on right now: those pending approval
    /// by any group the user belongs to, or every pending task should
    /// the user be an administrator.
    pub async fn list_pending_tasks_for(
        &self,
        user_id: i64,
    ) -> Result<TaskInstances, Error> {
        let actor = self.actor(user_id).await?;
        let tasks = if self.gate.overrides(&actor) {
            self.db.list_pending_tasks(None).await?
        } else {
            self.db.list_pending_tasks(Some(actor.group_ids.as_slice())).await?
        };
        Ok(tasks)
    }

    /// Returns the instance with its tasks in step order.
    pub async fn get_instance(&self, id: i64) -> Result<WorkflowInstance, Error> {
        self.db.get_instance(id).await?
            .ok_or_else(|| Error::NotFound(format!("workflow instance {id}")))
    }

    /// Every instance submitted against the resource, most recent first.
    pub async fn list_instances_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Vec<WorkflowInstance>, Error> {
        self.get_resource(resource_id).await?;
        Ok(self.db.list_instances_for_resource(resource_id).await?)
    }

    pub async fn get_active_instance_for_resource(
        &self,
        resource_id: i64,
    ) -> Result<Option<WorkflowInstance>, Error> {
        Ok(self.list_instances_for_resource(resource_id).await?
            .into_iter()
            .find(|instance| instance.status == InstanceStatus::InProgress))
    }

    async fn directory_for(
        &self,
        instances: &[WorkflowInstance],
    ) -> Result<(Vec<User>, Vec<Group>), Error> {
        let mut user_ids = Vec::new();
        let mut group_ids = Vec::new();
        for instance in instances {
            user_ids.push(instance.submitted_by);
            for task in instance.tasks()?.iter() {
                user_ids.extend(task.actioned_by);
                group_ids.push(task.group_id);
            }
        }
        user_ids.sort_unstable();
        user_ids.dedup();
        group_ids.sort_unstable();
        group_ids.dedup();
        let mut users = Vec::new();
        for id in user_ids {
            users.extend(self.db.get_user_by_id(id).await?);
        }
        let mut groups = Vec::new();
        for id in group_ids {
            groups.extend(self.db.get_group_by_id(id).await?);
        }
        Ok((users, groups))
    }

    /// A plain text summary of the instance and its steps.
    pub async fn instance_summary(
        &self,
        id: i64,
        include_comments: bool,
    ) -> Result<String, Error> {
        let instance = self.get_instance(id).await?;
        let (users, groups) = self.directory_for(std::slice::from_ref(&instance)).await?;
        let directory = Directory::new(&users, &groups);
        Ok(process_summary(&instance, &directory, include_comments)?)
    }

    /// A plain text summary of every instance for the resource.
    pub async fn resource_summary(
        &self,
        resource_id: i64,
        include_comments: bool,
    ) -> Result<String, Error> {
        let instances = self.list_instances_for_resource(resource_id).await?;
        let (users, groups) = self.directory_for(&instances).await?;
        let directory = Directory::new(&users, &groups);
        Ok(process_list(&instances, &directory, include_comments)?)
    }
}
