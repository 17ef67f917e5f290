//! Completion signals and the two task shapes
//!
//! A task is handed a [`Done`] and must eventually report through it.
//! `Done` is consumed on use, so a task can report at most once; dropping
//! it without reporting leaves the owning run waiting forever.

use std::fmt;
use std::sync::Arc;

type Report<T, E> = Box<dyn FnOnce(Option<E>, Option<T>) + Send>;

/// Zero-argument task: receives only its completion signal
pub type Task<T, E> = Box<dyn FnOnce(Done<T, E>) + Send>;

/// One-argument task: receives the predecessor's value and a completion signal
pub type Step<T, E> = Box<dyn FnOnce(Option<T>, Done<T, E>) + Send>;

/// Box a closure as a zero-argument [`Task`]
pub fn task<T, E, F>(f: F) -> Task<T, E>
where
    F: FnOnce(Done<T, E>) + Send + 'static,
{
    Box::new(f)
}

/// Box a closure as a one-argument [`Step`]
pub fn step<T, E, F>(f: F) -> Step<T, E>
where
    F: FnOnce(Option<T>, Done<T, E>) + Send + 'static,
{
    Box::new(f)
}

/// Single-use completion signal carrying an optional error and an optional value
pub struct Done<T, E> {
    report: Option<Report<T, E>>,
    watch: Option<Arc<str>>,
}

impl<T, E> Done<T, E> {
    /// Build a signal that forwards its report to `f`
    pub fn from_fn<F>(f: F) -> Self
    where
        F: FnOnce(Option<E>, Option<T>) + Send + 'static,
    {
        Self {
            report: Some(Box::new(f)),
            watch: None,
        }
    }

    pub(crate) fn watched<F>(watch: Option<Arc<str>>, f: F) -> Self
    where
        F: FnOnce(Option<E>, Option<T>) + Send + 'static,
    {
        Self {
            report: Some(Box::new(f)),
            watch,
        }
    }

    /// Report the raw `(error, value)` pair
    pub fn complete(mut self, error: Option<E>, value: Option<T>) {
        if let Some(report) = self.report.take() {
            report(error, value);
        }
    }

    /// Report success with a value
    pub fn ok(self, value: T) {
        self.complete(None, Some(value));
    }

    /// Report success without a value
    pub fn empty(self) {
        self.complete(None, None);
    }

    /// Report an error
    pub fn err(self, error: E) {
        self.complete(Some(error), None);
    }

    /// Report an error together with whatever value the task produced
    pub fn err_with(self, error: E, value: T) {
        self.complete(Some(error), Some(value));
    }

    /// Report a `Result`
    pub fn resolve(self, result: Result<T, E>) {
        match result {
            Ok(value) => self.ok(value),
            Err(error) => self.err(error),
        }
    }
}

impl<T, E> Drop for Done<T, E> {
    fn drop(&mut self) {
        if self.report.is_none() {
            return;
        }
        if let Some(name) = self.watch.as_deref() {
            tracing::warn!(
                flow = name,
                "completion signal dropped without reporting; run will not finish"
            );
        }
    }
}

impl<T, E> fmt::Debug for Done<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Done")
            .field("reported", &self.report.is_none())
            .field("watch", &self.watch)
            .finish()
    }
}
