//! Sequential execution with value threading
//!
//! Exactly one task is in flight at a time. Each task receives the value
//! its predecessor reported, the first error ends the run, and the main
//! callback gets whatever the last task to run reported.
//!
//! Dispatch is a trampoline: a task that reports before returning does not
//! start its successor from inside its own stack frame. The driver loop
//! picks the outcome up once the task returns, so long chains of
//! synchronous tasks run in constant stack depth.

use crate::config::Flow;
use crate::lock;
use crate::signal::{Done, Step, Task};
use std::sync::{Arc, Mutex};

struct SerialState<T, E, F> {
    steps: std::vec::IntoIter<Step<T, E>>,
    completed: usize,
    outcome: Option<(Option<E>, Option<T>)>,
    dispatching: bool,
    callback: Option<F>,
}

struct SerialRun<T, E, F> {
    name: Arc<str>,
    watch: Option<Arc<str>>,
    total: usize,
    state: Mutex<SerialState<T, E, F>>,
}

impl Flow {
    /// Run `tasks` one after another, threading each reported value into the next task
    ///
    /// The first task receives `None` as its input. An empty list calls
    /// `callback(None, None)` before returning.
    pub fn serial<T, E, F>(&self, tasks: Vec<Step<T, E>>, callback: F)
    where
        T: Send + 'static,
        E: Send + 'static,
        F: FnOnce(Option<E>, Option<T>) + Send + 'static,
    {
        let mut steps = tasks.into_iter();
        let Some(first) = steps.next() else {
            tracing::debug!(flow = self.name(), "serial run with no tasks");
            callback(None, None);
            return;
        };

        let total = steps.len() + 1;
        tracing::debug!(flow = self.name(), tasks = total, "serial run started");

        let run = Arc::new(SerialRun {
            name: self.shared_name(),
            watch: self.watch(),
            total,
            state: Mutex::new(SerialState {
                steps,
                completed: 0,
                outcome: None,
                dispatching: true,
                callback: Some(callback),
            }),
        });

        first(None, signal(&run));
        drive(&run);
    }

    /// Start a [`Chain`] whose first task takes no input
    pub fn chain<T, E>(&self, first: Task<T, E>) -> Chain<T, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        let head: Step<T, E> = Box::new(move |_, done| first(done));
        Chain {
            flow: self.clone(),
            steps: vec![head],
        }
    }
}

fn signal<T, E, F>(run: &Arc<SerialRun<T, E, F>>) -> Done<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Option<E>, Option<T>) + Send + 'static,
{
    let owner = Arc::clone(run);
    Done::watched(run.watch.clone(), move |error, value| {
        settle(&owner, error, value);
    })
}

fn settle<T, E, F>(run: &Arc<SerialRun<T, E, F>>, error: Option<E>, value: Option<T>)
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Option<E>, Option<T>) + Send + 'static,
{
    let mut state = lock(&run.state);
    state.outcome = Some((error, value));
    if state.dispatching {
        // The driver loop is still on the stack and will pick this up.
        return;
    }
    state.dispatching = true;
    drop(state);
    drive(run);
}

fn drive<T, E, F>(run: &Arc<SerialRun<T, E, F>>)
where
    T: Send + 'static,
    E: Send + 'static,
    F: FnOnce(Option<E>, Option<T>) + Send + 'static,
{
    loop {
        let mut state = lock(&run.state);
        let Some((error, value)) = state.outcome.take() else {
            state.dispatching = false;
            return;
        };

        let index = state.completed;
        state.completed += 1;
        tracing::trace!(
            flow = &*run.name,
            index,
            failed = error.is_some(),
            "serial task completed"
        );

        if error.is_some() || state.completed >= run.total {
            let callback = state.callback.take();
            drop(state);
            if let Some(callback) = callback {
                tracing::debug!(
                    flow = &*run.name,
                    completed = index + 1,
                    failed = error.is_some(),
                    "serial run finished"
                );
                callback(error, value);
            }
            return;
        }

        let Some(next) = state.steps.next() else {
            return;
        };
        drop(state);
        next(value, signal(run));
    }
}

/// Builder for a serial run whose first task takes no input
///
/// ```
/// use async_flow::{task, Chain};
///
/// Chain::start(task(|done| done.ok(String::from("a"))))
///     .then(|input: Option<String>, done| {
///         done.ok(input.unwrap_or_default() + "b")
///     })
///     .run(|error: Option<()>, value| {
///         assert!(error.is_none());
///         assert_eq!(value.as_deref(), Some("ab"));
///     });
/// ```
pub struct Chain<T, E> {
    flow: Flow,
    steps: Vec<Step<T, E>>,
}

impl<T, E> Chain<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    /// Start a chain under the default [`Flow`]
    pub fn start(first: Task<T, E>) -> Self {
        Flow::default().chain(first)
    }

    /// Append a task that receives the previous task's value
    #[must_use]
    pub fn then<G>(mut self, next: G) -> Self
    where
        G: FnOnce(Option<T>, Done<T, E>) + Send + 'static,
    {
        self.steps.push(Box::new(next));
        self
    }

    /// Append an already boxed [`Step`]
    #[must_use]
    pub fn then_step(mut self, next: Step<T, E>) -> Self {
        self.steps.push(next);
        self
    }

    /// Number of tasks in the chain
    #[must_use]
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    /// A chain always holds at least its first task
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run the chain, reporting to `callback`
    pub fn run<F>(self, callback: F)
    where
        F: FnOnce(Option<E>, Option<T>) + Send + 'static,
    {
        self.flow.serial(self.steps, callback);
    }

    pub(crate) fn into_parts(self) -> (Flow, Vec<Step<T, E>>) {
        (self.flow, self.steps)
    }
}
