use std::sync::{Mutex, MutexGuard, PoisonError};

use qshell_core::model::HistoryEntry;

/// The browser history operations the navigator relies on.
pub trait HistoryPort: Send + Sync {
    /// Add an entry after the current one, dropping any forward entries.
    fn push(&self, entry: HistoryEntry, url: &str);
    /// Overwrite the current entry without adding one.
    fn replace(&self, entry: HistoryEntry, url: &str);
    fn current(&self) -> HistoryEntry;
    /// Visible URL of the current entry.
    fn location(&self) -> String;
}

#[derive(Debug, Clone)]
struct Slot {
    entry: HistoryEntry,
    url: String,
}

#[derive(Debug)]
struct Stack {
    slots: Vec<Slot>,
    cursor: usize,
}

/// In-process session history with back/forward traversal.
///
/// `back` and `forward` return the entry that becomes current, which is what
/// a popstate event would carry.
#[derive(Debug)]
pub struct SessionHistory {
    stack: Mutex<Stack>,
}

impl SessionHistory {
    /// Start with a single stateless entry for the statically served page.
    #[must_use]
    pub fn new(initial_url: impl Into<String>) -> Self {
        Self {
            stack: Mutex::new(Stack {
                slots: vec![Slot {
                    entry: HistoryEntry::empty(),
                    url: initial_url.into(),
                }],
                cursor: 0,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Stack> {
        self.stack.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().slots.is_empty()
    }

    #[must_use]
    pub fn can_go_back(&self) -> bool {
        self.lock().cursor > 0
    }

    #[must_use]
    pub fn can_go_forward(&self) -> bool {
        let stack = self.lock();
        stack.cursor + 1 < stack.slots.len()
    }

    pub fn back(&self) -> Option<HistoryEntry> {
        let mut stack = self.lock();
        stack.cursor = stack.cursor.checked_sub(1)?;
        Some(stack.slots[stack.cursor].entry.clone())
    }

    pub fn forward(&self) -> Option<HistoryEntry> {
        let mut stack = self.lock();
        if stack.cursor + 1 >= stack.slots.len() {
            return None;
        }
        stack.cursor += 1;
        Some(stack.slots[stack.cursor].entry.clone())
    }

    /// All entries, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<HistoryEntry> {
        self.lock().slots.iter().map(|slot| slot.entry.clone()).collect()
    }
}

impl HistoryPort for SessionHistory {
    fn push(&self, entry: HistoryEntry, url: &str) {
        let mut stack = self.lock();
        let keep = stack.cursor + 1;
        stack.slots.truncate(keep);
        stack.slots.push(Slot {
            entry,
            url: url.to_owned(),
        });
        stack.cursor = keep;
    }

    fn replace(&self, entry: HistoryEntry, url: &str) {
        let mut stack = self.lock();
        let cursor = stack.cursor;
        stack.slots[cursor] = Slot {
            entry,
            url: url.to_owned(),
        };
    }

    fn current(&self) -> HistoryEntry {
        let stack = self.lock();
        stack.slots[stack.cursor].entry.clone()
    }

    fn location(&self) -> String {
        let stack = self.lock();
        stack.slots[stack.cursor].url.clone()
    }
}
