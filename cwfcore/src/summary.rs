//! Plain text renderings of workflow records.

use chrono::DateTime;
use std::collections::HashMap;
use crate::{
    ac::{
        group::Group,
        user::User,
    },
    error::ValueError,
    workflow::{
        TaskInstance,
        TaskStatus,
        WorkflowInstance,
    },
};

/// Name lookups for the users and groups referenced by the records
/// being rendered.
#[derive(Debug, Default)]
pub struct Directory<'a> {
    users: HashMap<i64, &'a User>,
    groups: HashMap<i64, &'a Group>,
}

impl<'a> Directory<'a> {
    pub fn new(
        users: impl IntoIterator<Item = &'a User>,
        groups: impl IntoIterator<Item = &'a Group>,
    ) -> Self {
        Self {
            users: users.into_iter().map(|user| (user.id, user)).collect(),
            groups: groups.into_iter().map(|group| (group.id, group)).collect(),
        }
    }

    pub fn user_name(&self, id: i64) -> String {
        self.users.get(&id)
            .map(|user| user.name.clone())
            .unwrap_or_else(|| format!("user #{id}"))
    }

    pub fn group_name(&self, id: i64) -> String {
        self.groups.get(&id)
            .map(|group| group.name.clone())
            .unwrap_or_else(|| format!("group #{id}"))
    }
}

pub fn format_date(ts: i64) -> String {
    DateTime::from_timestamp(ts, 0)
        .map(|dt| dt.format("%d/%m/%y").to_string())
        .unwrap_or_else(|| ts.to_string())
}

pub fn task_summary(
    task: &TaskInstance,
    directory: &Directory,
    include_comments: bool,
) -> String {
    let group = directory.group_name(task.group_id);
    let mut result = match (task.status, task.actioned_by, task.completed_ts) {
        (
            TaskStatus::Approved | TaskStatus::Rejected | TaskStatus::Cancelled,
            Some(actor),
            Some(ts),
        ) => format!(
            "{group}: {} by {} on {}",
            task.status,
            directory.user_name(actor),
            format_date(ts),
        ),
        (TaskStatus::Cancelled, _, Some(ts)) => format!(
            "{group}: {} on {}",
            task.status,
            format_date(ts),
        ),
        (status, _, _) => format!("{group}: {status}"),
    };
    if let (true, Some(comment)) = (include_comments, task.comment.as_deref()) {
        if !comment.is_empty() {
            result.push_str(&format!(" - Comment: {comment}"));
        }
    }
    result
}

/// A summary of the instance followed by one line per task in step
/// order.
pub fn process_summary(
    instance: &WorkflowInstance,
    directory: &Directory,
    include_comments: bool,
) -> Result<String, ValueError> {
    let mut lines = vec![format!(
        "{} requested by {} on {} - {}",
        instance.action.description(),
        directory.user_name(instance.submitted_by),
        format_date(instance.created_ts),
        instance.status,
    )];
    if let (true, Some(comment)) = (include_comments, instance.comment.as_deref()) {
        if !comment.is_empty() {
            lines.push(format!("  Comment: {comment}"));
        }
    }
    lines.extend(instance.tasks()?
        .iter()
        .map(|task| format!("  {}", task_summary(task, directory, include_comments))));
    Ok(lines.join("\n"))
}

pub fn process_list(
    instances: &[WorkflowInstance],
    directory: &Directory,
    include_comments: bool,
) -> Result<String, ValueError> {
    if instances.is_empty() {
        return Ok("None.".to_string());
    }
    Ok(instances.iter()
        .map(|instance| process_summary(instance, directory, include_comments))
        .collect::<Result<Vec<_>, _>>()?
        .join("\n\n"))
}
