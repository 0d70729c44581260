use async_trait::async_trait;
use std::fmt;
use crate::{
    error::NotifyError,
    text::pascal_case_to_title_case,
    workflow::{
        TaskInstance,
        WorkflowInstance,
    },
};
use super::*;

impl EventKind {
    pub fn title(&self) -> String {
        pascal_case_to_title_case(&format!("{self:?}"))
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.title())
    }
}

impl WorkflowEvent {
    pub fn for_instance(
        kind: EventKind,
        instance: &WorkflowInstance,
        actor_id: i64,
        comment: Option<String>,
        ts: i64,
    ) -> Self {
        Self {
            kind,
            instance_id: instance.id,
            task_id: None,
            resource_id: instance.resource_id,
            action: instance.action,
            actor_id,
            group_id: None,
            comment,
            ts,
        }
    }

    pub fn for_task(
        kind: EventKind,
        instance: &WorkflowInstance,
        task: &TaskInstance,
        actor_id: i64,
        comment: Option<String>,
        ts: i64,
    ) -> Self {
        Self {
            task_id: Some(task.id),
            group_id: Some(task.group_id),
            ..Self::for_instance(kind, instance, actor_id, comment, ts)
        }
    }

    /// The subject line for a notification about this event.
    pub fn subject(&self, resource_name: &str) -> String {
        format!(
            "{} - {} ({})",
            self.kind.title(),
            resource_name,
            self.action.description(),
        )
    }
}

#[async_trait]
impl Notifier for LogNotifier {
    async fn emit(&self, event: &WorkflowEvent) -> Result<(), NotifyError> {
        log::info!(
            "{}: instance {} on resource {} by user {}{}",
            event.kind,
            event.instance_id,
            event.resource_id,
            event.actor_id,
            event.task_id
                .map(|id| format!(" (task {id})"))
                .unwrap_or_default(),
        );
        Ok(())
    }
}
