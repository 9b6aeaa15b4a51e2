/*
[INPUT]:  Task-instance ID lists from error groups, prev/next/close actions
[OUTPUT]: Sample cursor state (closed, or viewing one sample of a group)
[POS]:    Panel core - paging state machine for error samples
[UPDATE]: When changing paging transitions or cursor bounds
*/

/// Position inside a non-empty list of task-instance IDs.
///
/// Invariant: `index < ids.len()` and `ids` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCursor {
    index: usize,
    ids: Vec<u64>,
}

impl SampleCursor {
    /// Cursor at the first sample; `None` for an empty list.
    pub fn new(ids: Vec<u64>) -> Option<Self> {
        if ids.is_empty() {
            return None;
        }
        Some(Self { index: 0, ids })
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn ids(&self) -> &[u64] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Task instance currently being viewed
    pub fn current(&self) -> u64 {
        self.ids[self.index]
    }

    pub fn has_previous(&self) -> bool {
        self.index > 0
    }

    pub fn has_next(&self) -> bool {
        self.index + 1 < self.ids.len()
    }

    /// Advance one sample. Returns `false` (and does nothing) at the last one.
    pub fn next(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.index += 1;
        true
    }

    /// Step back one sample. Returns `false` (and does nothing) at the first one.
    pub fn previous(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.index -= 1;
        true
    }

    /// "2 of 5"
    pub fn position_label(&self) -> String {
        format!("{} of {}", self.index + 1, self.ids.len())
    }
}

/// Whether the sample modal is open, and on which sample.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    Closed,
    Viewing(SampleCursor),
}

impl Selection {
    /// Open on the first sample of `ids`, replacing any previous cursor.
    ///
    /// An empty list closes the modal instead; returns whether it is open.
    pub fn select(&mut self, ids: Vec<u64>) -> bool {
        *self = match SampleCursor::new(ids) {
            Some(cursor) => Selection::Viewing(cursor),
            None => Selection::Closed,
        };
        self.is_open()
    }

    /// Returns whether the cursor moved.
    pub fn next(&mut self) -> bool {
        match self {
            Selection::Viewing(cursor) => cursor.next(),
            Selection::Closed => false,
        }
    }

    /// Returns whether the cursor moved.
    pub fn previous(&mut self) -> bool {
        match self {
            Selection::Viewing(cursor) => cursor.previous(),
            Selection::Closed => false,
        }
    }

    pub fn close(&mut self) {
        *self = Selection::Closed;
    }

    pub fn is_open(&self) -> bool {
        matches!(self, Selection::Viewing(_))
    }

    pub fn cursor(&self) -> Option<&SampleCursor> {
        match self {
            Selection::Viewing(cursor) => Some(cursor),
            Selection::Closed => None,
        }
    }

    pub fn current_task_instance(&self) -> Option<u64> {
        self.cursor().map(SampleCursor::current)
    }
}
