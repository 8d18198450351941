//! Extension capability and the event bus extensions subscribe through.

use async_trait::async_trait;
use log::debug;

use crate::event::{EventKind, LifecycleEvent};

/// Something the runner notifies about lifecycle events it subscribed to.
#[async_trait(?Send)]
pub trait Extension {
    fn name(&self) -> &str;

    /// Event kinds this extension wants to receive.
    fn subscriptions(&self) -> &'static [EventKind];

    /// Handles one event. Must not fail the run: problems are reported by the
    /// extension itself.
    async fn handle_event(&mut self, event: &LifecycleEvent);
}

/// Dispatches each event, in registration order, to the extensions subscribed
/// to its kind. Handlers run one after another.
#[derive(Default)]
pub struct EventBus {
    extensions: Vec<Box<dyn Extension>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, extension: Box<dyn Extension>) {
        debug!(
            "registering extension '{}' for {:?}",
            extension.name(),
            extension.subscriptions()
        );
        self.extensions.push(extension);
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }

    /// Returns how many extensions handled the event.
    pub async fn emit(&mut self, event: &LifecycleEvent) -> usize {
        let kind = event.kind();
        let mut handled = 0;
        for extension in self.extensions.iter_mut() {
            if extension.subscriptions().contains(&kind) {
                extension.handle_event(event).await;
                handled += 1;
            }
        }
        handled
    }
}
