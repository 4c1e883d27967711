//! Numbered message history shown in the status bar.

use std::collections::VecDeque;

/// One history line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub number: u64,
    pub text: String,
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.number, self.text)
    }
}

/// Bounded history with a browsing cursor.
///
/// New messages move the cursor to the newest entry. When the capacity is
/// exceeded the oldest entry is dropped; numbering keeps counting.
#[derive(Debug, Clone)]
pub struct History {
    entries: VecDeque<Entry>,
    capacity: usize,
    next_number: u64,
    cursor: usize,
}

impl History {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity: capacity.max(1),
            next_number: 1,
            cursor: 0,
        }
    }

    /// Append a message.
    pub fn push(&mut self, text: impl Into<String>) {
        let text = uppercase_first(&text.into());
        self.entries.push_back(Entry {
            number: self.next_number,
            text,
        });
        self.next_number += 1;
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = self.entries.len() - 1;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries oldest first.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&Entry> {
        self.entries.get(self.cursor)
    }

    pub fn first(&mut self) -> Option<&Entry> {
        self.cursor = 0;
        self.current()
    }

    pub fn last(&mut self) -> Option<&Entry> {
        self.cursor = self.entries.len().saturating_sub(1);
        self.current()
    }

    /// Step towards older entries, stopping at the first one.
    pub fn previous(&mut self) -> Option<&Entry> {
        self.cursor = self.cursor.saturating_sub(1);
        self.current()
    }

    /// Step towards newer entries, stopping at the last one.
    pub fn next(&mut self) -> Option<&Entry> {
        if self.cursor + 1 < self.entries.len() {
            self.cursor += 1;
        }
        self.current()
    }

    /// Forget everything and restart numbering.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.next_number = 1;
        self.cursor = 0;
    }
}

fn uppercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(c) => c.to_uppercase().to_string() + chars.as_str(),
    }
}
