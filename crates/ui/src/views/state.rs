use dioxus::prelude::*;

/// Render counter of the shell.
///
/// Bumped whenever the services report a change; views read it so they
/// re-render against the latest document and session state.
#[derive(Clone, Copy, PartialEq)]
pub struct Revision(Signal<u64>);

impl Revision {
    #[must_use]
    pub fn new() -> Self {
        Self(Signal::new(0))
    }

    /// Subscribe the calling component to changes.
    pub fn track(&self) -> u64 {
        *self.0.read()
    }

    pub fn bump(mut self) {
        *self.0.write() += 1;
    }
}

impl Default for Revision {
    fn default() -> Self {
        Self::new()
    }
}
