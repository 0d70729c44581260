use async_trait::async_trait;
use cwfcore::{
    error::NotifyError,
    event::{
        Notifier,
        WorkflowEvent,
    },
};
use tokio::sync::mpsc::{
    UnboundedReceiver,
    UnboundedSender,
    unbounded_channel,
};

/// Forwards events to a channel drained by an external dispatcher.
#[derive(Clone, Debug)]
pub struct ChannelNotifier(UnboundedSender<WorkflowEvent>);

impl ChannelNotifier {
    pub fn new() -> (Self, UnboundedReceiver<WorkflowEvent>) {
        let (sender, receiver) = unbounded_channel();
        (Self(sender), receiver)
    }
}

#[async_trait]
impl Notifier for ChannelNotifier {
    async fn emit(&self, event: &WorkflowEvent) -> Result<(), NotifyError> {
        self.0.send(event.clone())
            .map_err(|_| NotifyError::Closed)
    }
}

/// Hands the events of a committed transition to the notifier.
///
/// Delivery failures are logged and otherwise ignored, as the state
/// change they describe stands regardless.
pub(crate) async fn dispatch(notifier: &dyn Notifier, events: &[WorkflowEvent]) {
    for event in events {
        if let Err(e) = notifier.emit(event).await {
            log::warn!(
                "failed to emit {} for workflow instance {}: {e}",
                event.kind,
                event.instance_id,
            );
        }
    }
}
