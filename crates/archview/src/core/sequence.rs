//! Order labels for dynamic-view steps
//!
//! A [`SequenceNumber`] owns an explicit stack of [`SequenceCounter`]s. The
//! bottom counter is the main sequence. A parallel counter starts from the
//! value of the counter below it and prints flat, so parallel branches share
//! numbers with the main sequence. A hierarchical counter opens a new dotted
//! segment ("2.1", "2.2", ...).

use std::fmt;

use crate::core::{ViewError, ViewResult};

/// How a counter relates to the counter below it on the stack
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterKind {
    /// The main sequence
    Root,
    /// A parallel branch sharing the numbering of its parent
    Parallel,
    /// A nested sub-sequence printed as "parent.self"
    Hierarchical,
}

/// A single mutable counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceCounter {
    sequence: u32,
    kind: CounterKind,
}

impl SequenceCounter {
    /// A root counter starting at 0
    pub fn new() -> Self {
        Self {
            sequence: 0,
            kind: CounterKind::Root,
        }
    }

    /// A parallel counter continuing from the parent's current value
    pub fn parallel_to(parent: &SequenceCounter) -> Self {
        Self {
            sequence: parent.sequence,
            kind: CounterKind::Parallel,
        }
    }

    /// A hierarchical counter; its first label is "parent.1"
    pub fn hierarchical() -> Self {
        Self {
            sequence: 0,
            kind: CounterKind::Hierarchical,
        }
    }

    pub fn increment(&mut self) {
        self.sequence += 1;
    }

    pub fn sequence(&self) -> u32 {
        self.sequence
    }

    pub fn kind(&self) -> CounterKind {
        self.kind
    }
}

impl Default for SequenceCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SequenceCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sequence)
    }
}

/// Generator for dynamic-view order labels
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceNumber {
    /// Never empty; the first entry is the root counter
    counters: Vec<SequenceCounter>,
}

impl Default for SequenceNumber {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceNumber {
    pub fn new() -> Self {
        Self {
            counters: vec![SequenceCounter::new()],
        }
    }

    /// Reset to a main sequence whose next label is `sequence + 1`
    pub fn resume_from(sequence: u32) -> Self {
        Self {
            counters: vec![SequenceCounter {
                sequence,
                kind: CounterKind::Root,
            }],
        }
    }

    /// Number of open branches above the main sequence
    pub fn depth(&self) -> usize {
        self.counters.len() - 1
    }

    /// Increment the counter at the current depth and return its label
    pub fn get_next(&mut self) -> String {
        if let Some(counter) = self.counters.last_mut() {
            counter.increment();
        }
        self.label()
    }

    /// The label of the current position, without incrementing
    pub fn label(&self) -> String {
        let mut segments: Vec<u32> = Vec::new();
        for counter in &self.counters {
            match counter.kind {
                CounterKind::Hierarchical => segments.push(counter.sequence),
                CounterKind::Root | CounterKind::Parallel => match segments.last_mut() {
                    Some(last) => *last = counter.sequence,
                    None => segments.push(counter.sequence),
                },
            }
        }
        segments
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Begin a parallel branch that restarts from the current number
    pub fn start_parallel_sequence(&mut self) {
        let parent = self.top();
        self.counters.push(SequenceCounter::parallel_to(&parent));
    }

    /// Close the innermost parallel branch
    ///
    /// With `continue_numbering` the parent absorbs the branch's count, so
    /// later steps continue after it. Without it the parent is unchanged and
    /// a sibling branch restarts at the same number.
    pub fn end_parallel_sequence(&mut self, continue_numbering: bool) -> ViewResult<()> {
        let branch = self.pop(CounterKind::Parallel)?;
        if continue_numbering {
            if let Some(parent) = self.counters.last_mut() {
                parent.sequence = branch.sequence;
            }
        }
        Ok(())
    }

    /// Begin a nested sub-sequence ("n.1", "n.2", ...)
    pub fn start_subsequence(&mut self) {
        self.counters.push(SequenceCounter::hierarchical());
    }

    /// Close the innermost nested sub-sequence
    pub fn end_subsequence(&mut self) -> ViewResult<()> {
        self.pop(CounterKind::Hierarchical).map(|_| ())
    }

    fn top(&self) -> SequenceCounter {
        self.counters.last().copied().unwrap_or_default()
    }

    fn pop(&mut self, expected: CounterKind) -> ViewResult<SequenceCounter> {
        match self.counters.last() {
            Some(counter) if counter.kind == expected && self.counters.len() > 1 => {
                Ok(self.counters.pop().unwrap_or_default())
            }
            _ => Err(ViewError::invalid_argument(match expected {
                CounterKind::Parallel => "No parallel sequence has been started.",
                _ => "No sub-sequence has been started.",
            })),
        }
    }
}
