use qshell_core::model::{LanguageCode, PageName};
use tokio::sync::broadcast;
use tracing::trace;

const CHANNEL_CAPACITY: usize = 64;

/// In-process signals exchanged between shell components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    /// A page's fragment is in place and its behavior finished initializing.
    PageReady(PageName),
    /// A translation table was cached.
    LanguageLoaded(LanguageCode),
    /// The session view was recomputed (login, logout, resync).
    SessionChanged,
    /// Content region or title changed.
    DocumentChanged,
}

/// Publish/subscribe hub for `ShellEvent`s.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<ShellEvent>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }

    /// Deliver to all current subscribers; publishing with none is fine.
    pub fn publish(&self, event: ShellEvent) {
        if self.sender.send(event.clone()).is_err() {
            trace!(?event, "no subscribers");
        }
    }

    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<ShellEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
