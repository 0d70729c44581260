use async_trait::async_trait;
use cwfcore::{
    error::NotifyError,
    event::{
        EventKind,
        Notifier,
        WorkflowEvent,
    },
};
use mockall::mock;
use parking_lot::Mutex;

mock! {
    pub Notifier {}

    #[async_trait]
    impl Notifier for Notifier {
        async fn emit(&self, event: &WorkflowEvent) -> Result<(), NotifyError>;
    }
}

/// Keeps every event it was handed, in order.
#[derive(Debug, Default)]
pub struct RecordingNotifier(Mutex<Vec<WorkflowEvent>>);

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<WorkflowEvent> {
        self.0.lock().clone()
    }

    pub fn kinds(&self) -> Vec<EventKind> {
        self.0.lock().iter().map(|event| event.kind).collect()
    }

    /// Returns the events recorded so far, leaving none behind.
    pub fn take(&self) -> Vec<WorkflowEvent> {
        std::mem::take(&mut *self.0.lock())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn emit(&self, event: &WorkflowEvent) -> Result<(), NotifyError> {
        self.0.lock().push(event.clone());
        Ok(())
    }
}
