//! Append-only iteration traces.
//!
//! Solvers are split into pure step functions returning `(next_state, record)`
//! and thin harness loops that push each record into a [`Trace`]. Callers only
//! get read access, so a returned trace is immutable history.

use alloc::vec::Vec;

/// Ordered sequence of step records, indexed by iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct Trace<R> {
    records: Vec<R>,
}

impl<R> Trace<R> {
    pub(crate) fn new() -> Self {
        Self {
            records: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, record: R) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn last(&self) -> Option<&R> {
        self.records.last()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, R> {
        self.records.iter()
    }

    pub fn into_records(self) -> Vec<R> {
        self.records
    }
}

impl<R> Default for Trace<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, R> IntoIterator for &'a Trace<R> {
    type Item = &'a R;
    type IntoIter = core::slice::Iter<'a, R>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl<R> core::ops::Index<usize> for Trace<R> {
    type Output = R;

    fn index(&self, i: usize) -> &R {
        &self.records[i]
    }
}
