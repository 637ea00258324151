use std::slice::Iter;

use super::errors::{Error, ErrorKind};

/// Accumulates errors from every pass of a compilation unit.
///
/// Checks push their findings here instead of aborting. Output is always
/// stably ordered by source position, independent of the order the checks
/// ran in.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<Error>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics { errors: vec![] }
    }

    pub fn push(&mut self, error: Error) {
        self.errors.push(error);
    }

    pub fn extend<I: IntoIterator<Item = Error>>(&mut self, errors: I) {
        self.errors.extend(errors);
    }

    /// Records the error side of a result and hands back the value, if any.
    pub fn take<T>(&mut self, result: Result<T, Error>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(error) => {
                self.errors.push(error);
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> Iter<'_, Error> {
        self.errors.iter()
    }

    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|error| error.kind() == kind).count()
    }

    pub fn kinds(&self) -> Vec<ErrorKind> {
        self.errors.iter().map(|error| error.kind()).collect()
    }

    pub fn sort(&mut self) {
        // `sort_by` is stable, errors at the same position keep check order
        self.errors.sort_by(|a, b| a.get_position().cmp(b.get_position()));
    }

    pub fn into_sorted(mut self) -> Vec<Error> {
        self.sort();
        self.errors
    }
}

impl IntoIterator for Diagnostics {
    type Item = Error;
    type IntoIter = std::vec::IntoIter<Error>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_sorted().into_iter()
    }
}
