use cwfcore::{
    ac::Authority,
    workflow::ActionType,
};
use cwfctrl::platform::{
    Builder,
    Platform,
};
use std::sync::Arc;

use crate::{
    clock::FixedClock,
    notifier::RecordingNotifier,
    sqlite::create_sqlite_backend,
};

pub async fn create_sqlite_platform() -> anyhow::Result<Platform> {
    Ok(Builder::new()
        .platform(create_sqlite_backend().await?)
        .clock(Arc::new(FixedClock::default()))
        .build()
        .await?)
}

/// A populated platform.
///
/// The resource tree is `page -> section -> site`.  Editors hold
/// `Approve` and Legal holds `Review` at the site, with every action
/// mapped to Editors followed by Legal.  The users are:
///
/// - `alice`, who submits and belongs to no group
/// - `bob`, a member of Editors
/// - `carol`, a member of Legal
/// - `dave`, a member of both
/// - `root`, a site administrator in no group
pub struct Fixture {
    pub platform: Platform,
    pub notifier: Arc<RecordingNotifier>,
    pub clock: Arc<FixedClock>,

    pub site: i64,
    pub section: i64,
    pub page: i64,

    pub editors: i64,
    pub legal: i64,

    pub alice: i64,
    pub bob: i64,
    pub carol: i64,
    pub dave: i64,
    pub root: i64,
}

pub async fn create_fixture() -> anyhow::Result<Fixture> {
    create_fixture_with(Builder::new()).await
}

pub async fn create_fixture_with(builder: Builder) -> anyhow::Result<Fixture> {
    let notifier = Arc::new(RecordingNotifier::new());
    let clock = Arc::new(FixedClock::default());
    let platform = builder
        .platform(create_sqlite_backend().await?)
        .notifier(notifier.clone())
        .clock(clock.clone())
        .build()
        .await?;

    let site = platform.add_resource("site", None).await?.id;
    let section = platform.add_resource("news", Some(site)).await?.id;
    let page = platform.add_resource("release", Some(section)).await?.id;

    let editors = platform.add_group("Editors", Some("editors@example.com")).await?.id;
    let legal = platform.add_group("Legal", Some("legal@example.com")).await?.id;

    let alice = platform.add_user("alice", Some("alice@example.com"), "member").await?.id;
    let bob = platform.add_user("bob", Some("bob@example.com"), "member").await?.id;
    let carol = platform.add_user("carol", None, "member").await?.id;
    let dave = platform.add_user("dave", None, "member").await?.id;
    let root = platform.add_user("root", None, "siteadmin").await?.id;

    platform.add_group_member(editors, bob).await?;
    platform.add_group_member(legal, carol).await?;
    platform.add_group_member(editors, dave).await?;
    platform.add_group_member(legal, dave).await?;

    platform.set_permission(site, editors, Authority::Approve).await?;
    platform.set_permission(site, legal, Authority::Review).await?;
    for action in [ActionType::Publish, ActionType::Unpublish, ActionType::Edit] {
        platform.set_approver_mapping(action, &[editors, legal]).await?;
    }

    Ok(Fixture {
        platform,
        notifier,
        clock,
        site,
        section,
        page,
        editors,
        legal,
        alice,
        bob,
        carol,
        dave,
        root,
    })
}
