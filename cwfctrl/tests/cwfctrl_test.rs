use cwfcore::{
    ac::Authority,
    error::NotifyError,
    event::EventKind,
    workflow::{
        ActionType,
        Decision,
        InstanceStatus,
        TaskInstance,
        TaskStatus,
        WorkflowInstance,
        machine::EmptyChainPolicy,
    },
};
use cwfctrl::{
    error::Error,
    notify::ChannelNotifier,
    platform::{
        Builder,
        Platform,
    },
};
use cwfrbac::Denial;
use std::sync::Arc;
use test_cwf::{
    ctrl::{
        Fixture,
        create_fixture,
        create_fixture_with,
    },
    clock::FixedClock,
    is_send_sync,
    notifier::MockNotifier,
    sqlite::create_sqlite_backend,
};

async fn tasks(platform: &Platform, id: i64) -> anyhow::Result<Vec<TaskInstance>> {
    Ok(platform.get_instance(id).await?.tasks()?.to_vec())
}

fn statuses(tasks: &[TaskInstance]) -> Vec<TaskStatus> {
    tasks.iter().map(|task| task.status).collect()
}

async fn assert_consistent(platform: &Platform, id: i64) -> anyhow::Result<WorkflowInstance> {
    let instance = platform.get_instance(id).await?;
    assert!(instance.is_consistent()?, "inconsistent instance {instance:#?}");
    Ok(instance)
}

/// Adds a third group holding `Admin` at the site and makes every
/// candidate group a required step for publishing.
async fn three_required_steps(fixture: &Fixture) -> anyhow::Result<i64> {
    let platform = &fixture.platform;
    let board = platform.add_group("Board", None).await?.id;
    platform.add_group_member(board, fixture.carol).await?;
    platform.set_permission(fixture.site, board, Authority::Admin).await?;
    platform.set_permission(fixture.site, fixture.legal, Authority::Approve).await?;
    platform.set_approver_mapping(
        ActionType::Publish,
        &[fixture.editors, fixture.legal, board],
    ).await?;
    Ok(board)
}

#[test]
fn platform_is_send_sync() {
    is_send_sync::<Platform>();
}

#[async_std::test]
async fn editors_approve_legal_reviews() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(
        fixture.page,
        ActionType::Publish,
        fixture.alice,
        Some("ready to go"),
    ).await?;

    let chain = tasks(platform, id).await?;
    assert_eq!(
        chain.iter().map(|task| (task.step_index, task.group_id, task.status)).collect::<Vec<_>>(),
        [
            (0, fixture.editors, TaskStatus::PendingApproval),
            (1, fixture.legal, TaskStatus::NotRequired),
        ],
    );

    let status = platform.act_on_task(chain[0].id, fixture.bob, Decision::Approve, None).await?;
    assert_eq!(status, InstanceStatus::Approved);
    let instance = assert_consistent(platform, id).await?;
    assert_eq!(instance.status, InstanceStatus::Approved);
    assert_eq!(instance.completed_ts, Some(1234567890));
    let chain = instance.tasks()?;
    assert_eq!(chain[0].status, TaskStatus::Approved);
    assert_eq!(chain[0].actioned_by, Some(fixture.bob));
    assert_eq!(chain[1].status, TaskStatus::NotRequired);
    assert_eq!(chain[1].actioned_by, None);
    Ok(())
}

#[async_std::test]
async fn editors_reject_cancels_legal() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    platform.set_permission(fixture.site, fixture.legal, Authority::Approve).await?;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let chain = tasks(platform, id).await?;
    assert_eq!(statuses(&chain), [TaskStatus::PendingApproval, TaskStatus::Awaiting]);

    fixture.clock.advance(60);
    let status = platform.act_on_task(
        chain[0].id,
        fixture.bob,
        Decision::Reject,
        Some("not yet"),
    ).await?;
    assert_eq!(status, InstanceStatus::Rejected);

    let instance = assert_consistent(platform, id).await?;
    assert_eq!(instance.status, InstanceStatus::Rejected);
    let chain = instance.tasks()?;
    assert_eq!(statuses(chain), [TaskStatus::Rejected, TaskStatus::Cancelled]);
    assert_eq!(chain[0].comment.as_deref(), Some("not yet"));
    assert_eq!(chain[1].actioned_by, None);
    assert_eq!(chain[1].completed_ts, Some(1234567950));
    Ok(())
}

#[async_std::test]
async fn approve_every_step_in_order() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    three_required_steps(&fixture).await?;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;

    let actors = [fixture.bob, fixture.carol, fixture.carol];
    for (step, actor) in actors.iter().enumerate() {
        let chain = tasks(platform, id).await?;
        assert_eq!(chain[step].status, TaskStatus::PendingApproval);
        assert!(chain[step + 1..].iter().all(|task| task.status == TaskStatus::Awaiting));
        let status = platform.act_on_task(chain[step].id, *actor, Decision::Approve, None).await?;
        let instance = assert_consistent(platform, id).await?;
        assert_eq!(instance.status, status);
        if step + 1 < actors.len() {
            assert_eq!(status, InstanceStatus::InProgress);
        } else {
            assert_eq!(status, InstanceStatus::Approved);
        }
    }
    assert_eq!(
        statuses(&tasks(platform, id).await?),
        [TaskStatus::Approved; 3],
    );
    Ok(())
}

#[async_std::test]
async fn reject_at_any_position() -> anyhow::Result<()> {
    for position in 0..3 {
        let fixture = create_fixture().await?;
        let platform = &fixture.platform;
        three_required_steps(&fixture).await?;
        let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
        let actors = [fixture.bob, fixture.carol, fixture.carol];
        for step in 0..position {
            let task = &tasks(platform, id).await?[step];
            platform.act_on_task(task.id, actors[step], Decision::Approve, None).await?;
        }
        let task = &tasks(platform, id).await?[position];
        let status = platform.act_on_task(
            task.id,
            actors[position],
            Decision::Reject,
            Some("no"),
        ).await?;
        assert_eq!(status, InstanceStatus::Rejected);

        let instance = assert_consistent(platform, id).await?;
        assert_eq!(instance.status, InstanceStatus::Rejected);
        for (step, task) in instance.tasks()?.iter().enumerate() {
            let expected = match step {
                step if step < position => TaskStatus::Approved,
                step if step == position => TaskStatus::Rejected,
                _ => TaskStatus::Cancelled,
            };
            assert_eq!(task.status, expected, "position {position} step {step}");
        }
    }
    Ok(())
}

#[async_std::test]
async fn concurrent_decisions() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let task = tasks(platform, id).await?[0].clone();

    let (first, second) = futures::join!(
        platform.act_on_task(task.id, fixture.bob, Decision::Approve, None),
        platform.act_on_task(task.id, fixture.dave, Decision::Reject, Some("no")),
    );
    let results = [first, second];
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert_eq!(
        results.iter()
            .filter(|result| matches!(result, Err(Error::InvalidState(_))))
            .count(),
        1,
    );

    let instance = assert_consistent(platform, id).await?;
    assert!(instance.status.is_terminal());
    let decided = instance.tasks()?[0].clone();
    match decided.status {
        TaskStatus::Approved => assert_eq!(decided.actioned_by, Some(fixture.bob)),
        TaskStatus::Rejected => assert_eq!(decided.actioned_by, Some(fixture.dave)),
        status => panic!("unexpected status {status:?}"),
    }
    assert_eq!(
        fixture.notifier.kinds().iter()
            .filter(|kind| matches!(kind, EventKind::TaskApproved | EventKind::TaskRejected))
            .count(),
        1,
    );
    Ok(())
}

#[async_std::test]
async fn concurrent_submissions() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let (first, second) = futures::join!(
        platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None),
        platform.submit_action(fixture.page, ActionType::Edit, fixture.bob, None),
    );
    let results = [first, second];
    assert_eq!(results.iter().filter(|result| result.is_ok()).count(), 1);
    assert!(results.iter().any(|result| matches!(result, Err(Error::InvalidState(_)))));
    assert_eq!(platform.list_instances_for_resource(fixture.page).await?.len(), 1);
    Ok(())
}

#[async_std::test]
async fn nearest_ancestor_wins() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    assert_eq!(platform.resolve(fixture.page, fixture.legal).await?, Authority::Review);
    platform.set_permission(fixture.section, fixture.legal, Authority::Approve).await?;
    assert_eq!(platform.resolve(fixture.page, fixture.legal).await?, Authority::Approve);
    assert_eq!(platform.resolve(fixture.site, fixture.legal).await?, Authority::Review);

    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    assert_eq!(
        statuses(&tasks(platform, id).await?),
        [TaskStatus::PendingApproval, TaskStatus::Awaiting],
    );

    platform.set_permission(fixture.page, fixture.editors, Authority::None).await?;
    let chain = platform.build_chain(fixture.page, ActionType::Unpublish).await?;
    assert!(!chain[0].required());
    assert!(chain[1].required());
    Ok(())
}

#[async_std::test]
async fn unauthorized_leaves_state_unchanged() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let before = platform.get_instance(id).await?;
    let task = before.tasks()?[0].clone();
    fixture.notifier.take();

    for actor in [fixture.alice, fixture.carol] {
        for decision in [Decision::Approve, Decision::Reject] {
            let result = platform.act_on_task(task.id, actor, decision, Some("mine")).await;
            assert!(matches!(
                result,
                Err(Error::Unauthorized(Denial::NotGroupMember { .. })),
            ));
        }
    }
    assert!(matches!(
        platform.cancel_instance(id, fixture.bob, Some("mine")).await,
        Err(Error::Unauthorized(Denial::NotSubmitter { .. })),
    ));

    assert_eq!(platform.get_instance(id).await?, before);
    assert!(fixture.notifier.events().is_empty());
    Ok(())
}

#[async_std::test]
async fn admin_override() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let pending = platform.list_pending_tasks_for(fixture.root).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(
        platform.act_on_task(pending[0].id, fixture.root, Decision::Approve, None).await?,
        InstanceStatus::Approved,
    );

    let id = platform.submit_action(fixture.section, ActionType::Edit, fixture.alice, None).await?;
    assert_eq!(
        platform.cancel_instance(id, fixture.root, Some("superseded")).await?,
        InstanceStatus::Cancelled,
    );
    Ok(())
}

#[async_std::test]
async fn cancel_records_actor_and_comment() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    platform.cancel_instance(id, fixture.root, Some("  legal hold ")).await?;

    let stored = tasks(platform, id).await?;
    assert_eq!(stored[0].status, TaskStatus::Cancelled);
    assert_eq!(stored[0].actioned_by, Some(fixture.root));
    assert_eq!(stored[0].comment.as_deref(), Some("legal hold"));
    assert_eq!(stored[1].status, TaskStatus::NotRequired);
    assert_eq!(stored[1].actioned_by, None);

    let json = serde_json::to_string(&platform.get_instance(id).await?)?;
    assert!(json.contains("legal hold"));
    let summary = platform.instance_summary(id, true).await?;
    assert!(summary.contains("Editors: Cancelled by root on 13/02/09 - Comment: legal hold"));
    Ok(())
}

#[async_std::test]
async fn admin_override_disabled_by_types() -> anyhow::Result<()> {
    let fixture = create_fixture_with(
        Builder::new().cwf_admin_user_types(["admin"])
    ).await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let task = tasks(platform, id).await?[0].clone();
    assert!(matches!(
        platform.act_on_task(task.id, fixture.root, Decision::Approve, None).await,
        Err(Error::Unauthorized(_)),
    ));
    assert!(platform.list_pending_tasks_for(fixture.root).await?.is_empty());
    Ok(())
}

#[async_std::test]
async fn terminal_transitions_fail() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let task = tasks(platform, id).await?[0].clone();
    platform.act_on_task(task.id, fixture.bob, Decision::Approve, None).await?;
    let after = platform.get_instance(id).await?;

    assert!(matches!(
        platform.act_on_task(task.id, fixture.bob, Decision::Approve, None).await,
        Err(Error::InvalidState(_)),
    ));
    assert!(matches!(
        platform.act_on_task(task.id, fixture.dave, Decision::Reject, Some("late")).await,
        Err(Error::InvalidState(_)),
    ));
    assert!(matches!(
        platform.cancel_instance(id, fixture.alice, Some("late")).await,
        Err(Error::InvalidState(_)),
    ));
    // the step that was never required cannot be acted on either
    let skipped = &after.tasks()?[1];
    assert!(matches!(
        platform.act_on_task(skipped.id, fixture.carol, Decision::Approve, None).await,
        Err(Error::InvalidState(_)),
    ));
    assert_eq!(platform.get_instance(id).await?, after);
    Ok(())
}

#[async_std::test]
async fn awaiting_step_cannot_be_actioned() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    platform.set_permission(fixture.site, fixture.legal, Authority::Approve).await?;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let chain = tasks(platform, id).await?;
    assert!(matches!(
        platform.act_on_task(chain[1].id, fixture.carol, Decision::Approve, None).await,
        Err(Error::InvalidState(_)),
    ));
    assert_eq!(tasks(platform, id).await?, chain);
    Ok(())
}

#[async_std::test]
async fn cancel_by_submitter() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    platform.set_permission(fixture.site, fixture.legal, Authority::Approve).await?;
    let id = platform.submit_action(fixture.page, ActionType::Unpublish, fixture.alice, None).await?;

    assert!(matches!(
        platform.cancel_instance(id, fixture.alice, Some("   ")).await,
        Err(Error::Validation(_)),
    ));
    assert_eq!(
        platform.cancel_instance(id, fixture.alice, Some("changed my mind")).await?,
        InstanceStatus::Cancelled,
    );
    let instance = assert_consistent(platform, id).await?;
    assert_eq!(
        statuses(instance.tasks()?),
        [TaskStatus::Cancelled, TaskStatus::Cancelled],
    );
    assert_eq!(platform.get_active_instance_for_resource(fixture.page).await?, None);
    Ok(())
}

#[async_std::test]
async fn comment_requirements() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let task = tasks(platform, id).await?[0].clone();
    assert!(matches!(
        platform.act_on_task(task.id, fixture.bob, Decision::Reject, None).await,
        Err(Error::Validation(_)),
    ));
    assert_eq!(tasks(platform, id).await?[0].status, TaskStatus::PendingApproval);

    let fixture = create_fixture_with(
        Builder::new()
            .cwf_reject_comment_required(false)
            .cwf_cancel_comment_required(false)
    ).await?;
    let platform = &fixture.platform;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let task = tasks(platform, id).await?[0].clone();
    assert_eq!(
        platform.act_on_task(task.id, fixture.bob, Decision::Reject, Some(" ")).await?,
        InstanceStatus::Rejected,
    );
    assert_eq!(tasks(platform, id).await?[0].comment, None);
    Ok(())
}

#[async_std::test]
async fn empty_chain_policies() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    platform.set_permission(fixture.site, fixture.editors, Authority::Review).await?;
    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    let instance = assert_consistent(platform, id).await?;
    assert_eq!(instance.status, InstanceStatus::Approved);
    assert_eq!(
        statuses(instance.tasks()?),
        [TaskStatus::NotRequired, TaskStatus::NotRequired],
    );
    assert_eq!(fixture.notifier.kinds(), [EventKind::InstanceApproved]);
    assert!(platform.list_pending_tasks_for(fixture.dave).await?.is_empty());

    let fixture = create_fixture_with(
        Builder::new().cwf_empty_chain(EmptyChainPolicy::Refuse)
    ).await?;
    let platform = &fixture.platform;
    platform.set_permission(fixture.site, fixture.editors, Authority::Review).await?;
    assert!(matches!(
        platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await,
        Err(Error::InvalidConfiguration(_)),
    ));
    assert!(platform.list_instances_for_resource(fixture.page).await?.is_empty());
    assert!(fixture.notifier.events().is_empty());
    Ok(())
}

#[async_std::test]
async fn pending_tasks_for_members() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    platform.set_permission(fixture.site, fixture.legal, Authority::Approve).await?;
    let first = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, None).await?;
    fixture.clock.advance(10);
    let second = platform.submit_action(fixture.section, ActionType::Edit, fixture.alice, None).await?;

    let pending = platform.list_pending_tasks_for(fixture.bob).await?;
    assert_eq!(
        pending.iter().map(|task| task.workflow_instance_id).collect::<Vec<_>>(),
        [first, second],
    );
    assert!(platform.list_pending_tasks_for(fixture.carol).await?.is_empty());
    assert!(platform.list_pending_tasks_for(fixture.alice).await?.is_empty());

    platform.act_on_task(pending[0].id, fixture.bob, Decision::Approve, None).await?;
    let pending = platform.list_pending_tasks_for(fixture.carol).await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].group_id, fixture.legal);
    assert_eq!(platform.list_pending_tasks_for(fixture.dave).await?.len(), 2);
    Ok(())
}

#[async_std::test]
async fn events_follow_commits() -> anyhow::Result<()> {
    let fixture = create_fixture().await?;
    let platform = &fixture.platform;
    platform.set_permission(fixture.site, fixture.legal, Authority::Approve).await?;

    let id = platform.submit_action(fixture.page, ActionType::Publish, fixture.alice, Some("hi")).await?;
    let events = fixture.notifier.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::InstanceSubmitted);
    assert_eq!(events[0].instance_id, id);
    assert_eq!(events[0].actor_id, fixture.alice);
    assert_eq!(events[0].comment.as_deref(), Some("hi"));
    assert_eq!(events[0].subject("release"), "Instance Submitted - release (Publish)");

    let chain = tasks(platform, id).await?;
    platform.act_on_task(chain[0].id, fixture.bob, Decision::Approve, None).await?;
    let events = fixture.notifier.take();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind, EventKind::TaskApproved);
    assert_eq!(events[0].task_id, Some(chain[0].id));
    assert_eq!(events[0].group_id, Some(fixture.editors));

    platform.act_on_task(chain[1].id, fixture.carol, Decision::Approve, Some("ok")).await?;
    assert_eq!(fixture.notifier.kinds(), [EventKind::TaskApproved, EventKind::InstanceApproved]);
    fixture.notifier.take();

    let id = platform.submit_action(fixture.page, ActionType::Unpublish, fixture.alice, None).await?;
    let chain = tasks(platform, id).await?;
    platform.act_on_task(chain[0].id, fixture.bob, Decision::Reject, Some("no")).await?;
    assert_eq!(fixture.notifier.kinds(), [
        EventKind::InstanceSubmitted,
        EventKind::TaskRejected,
        EventKind::InstanceRejected,
    ]);
    fixture.notifier.take();

    let id = platform.submit_action(fixture.page, ActionType::Edit, fixture.alice, None).await?;
    platform.cancel_instance(id, fixture.alice, Some("oops")).await?;
    assert_eq!(fixture.notifier.kinds(), [
        EventKind::InstanceSubmitted,
        EventKind::InstanceCancelled,
    ]);
    Ok(())
}

#[async_std::test]
async fn notifier_failure_keeps_commit() -> anyhow::Result<()> {
    let mut notifier = MockNotifier::new();
    notifier.expect_emit()
        .returning(|_| Err(NotifyError::Transport("smtp down".into())));
    let platform = Builder::new()
        .platform(create_sqlite_backend().await?)
        .notifier(Arc::new(notifier))
        .clock(Arc::new(FixedClock::default()))
        .build()
        .await?;
    let page = platform.add_resource("page", None).await?.id;
    let editors = platform.add_group("Editors", None).await?.id;
    let alice = platform.add_user("alice", None, "member").await?.id;
    let bob = platform.add_user("bob", None, "member").await?.id;
    platform.add_group_member(editors, bob).await?;
    platform.set_permission(page, editors, Authority::Approve).await?;
    platform.set_approver_mapping(ActionType::Publish, &[editors]).await?;

    let id = platform.submit_action(page, ActionType::Publish, alice, None).await?;
    let task = tasks(&platform, id).await?[0].clone();
    assert_eq!(
        platform.act_on_task(task.id, bob, Decision::Approve, None).await?,
        InstanceStatus::Approved,
    );
    assert_eq!(platform.get_instance(id).await?.status, InstanceStatus::Approved);
    Ok(())
}

#[async_std::test]
async fn channel_notifier() -> anyhow::Result<()> {
    let (notifier, mut receiver) = ChannelNotifier::new();
    let platform = Builder::new()
        .platform(create_sqlite_backend().await?)
        .notifier(Arc::new(notifier))
        .build()
        .await?;
    let page = platform.add_resource("page", None).await?.id;
    let editors = platform.add_group("Editors", None).await?.id;
    let alice = platform.add_user("alice", None, "member").await?.id;
    platform.set_permission(page, editors, Authority::Approve).await?;
    platform.set_approver_mapping(ActionType::Publish, &[editors]).await?;
    let id = platform.submit_action(page, ActionType::Publish, alice, None).await?;

    let event = receiver.try_recv()?;
    assert_eq!(event.kind, EventKind::InstanceSubmitted);
    assert_eq!(event.instance_id, id);
    assert!(receiver.try_recv().is_err());
    Ok(())
}
