//! `async`/`await` adapters over the callback combinators
//!
//! The combinators start their tasks eagerly, so the run is already under
//! way when one of these methods returns. The returned [`FlowFuture`] only
//! observes the main callback through a oneshot channel; dropping it does
//! not stop the run.

use crate::config::Flow;
use crate::error::{FlowError, Result};
use crate::map::project;
use crate::serial::Chain;
use crate::signal::{Done, Step, Task};
use futures::FutureExt;
use std::future::{Future, IntoFuture};
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

/// Future resolving to the outcome of a flow run
///
/// Resolves to `Err(FlowError::Task(_))` when a task reported an error and
/// to `Err(FlowError::Abandoned)` when every completion signal of the run
/// was dropped before the main callback could fire.
pub struct FlowFuture<R, E> {
    receiver: oneshot::Receiver<(Option<E>, R)>,
}

impl<R, E> FlowFuture<R, E>
where
    R: Send + 'static,
    E: Send + 'static,
{
    fn channel() -> (Self, impl FnOnce(Option<E>, R) + Send + 'static) {
        let (sender, receiver) = oneshot::channel();
        let callback = move |error, value| {
            // The caller may have stopped waiting; the run still finishes.
            let _ = sender.send((error, value));
        };
        (Self { receiver }, callback)
    }
}

impl<R, E> Future for FlowFuture<R, E> {
    type Output = Result<R, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        match Pin::new(&mut self.get_mut().receiver).poll(cx) {
            Poll::Ready(Ok((Some(error), _))) => Poll::Ready(Err(FlowError::Task(error))),
            Poll::Ready(Ok((None, value))) => Poll::Ready(Ok(value)),
            Poll::Ready(Err(_)) => Poll::Ready(Err(FlowError::Abandoned)),
            Poll::Pending => Poll::Pending,
        }
    }
}

impl Flow {
    /// [`Flow::serial`], resolved through a future
    pub fn serial_future<T, E>(&self, tasks: Vec<Step<T, E>>) -> FlowFuture<Option<T>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        let (future, callback) = FlowFuture::channel();
        self.serial(tasks, callback);
        future
    }

    /// [`Flow::parallel`], resolved through a future
    pub fn parallel_future<T, E>(&self, tasks: Vec<Task<T, E>>) -> FlowFuture<Vec<Option<T>>, E>
    where
        T: Send + 'static,
        E: Send + 'static,
    {
        let (future, callback) = FlowFuture::channel();
        self.parallel(tasks, callback);
        future
    }

    /// [`Flow::map`], resolved through a future
    pub fn map_future<I, V, T, E, P>(&self, values: I, projection: P) -> FlowFuture<Vec<Option<T>>, E>
    where
        I: IntoIterator<Item = V>,
        V: Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        P: Fn(V, Done<T, E>) + Send + Sync + 'static,
    {
        self.parallel_future(project(values, projection))
    }

    /// Map each value through an async function, one spawned tokio task per value
    ///
    /// # Panics
    ///
    /// Panics if called outside a tokio runtime.
    pub fn map_async<I, V, T, E, G, Fut>(&self, values: I, f: G) -> FlowFuture<Vec<Option<T>>, E>
    where
        I: IntoIterator<Item = V>,
        V: Send + 'static,
        T: Send + 'static,
        E: Send + 'static,
        G: Fn(V) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
    {
        self.map_future(values, move |value, done| spawn_resolve(f(value), done))
    }
}

impl<T, E> IntoFuture for Chain<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
{
    type Output = Result<Option<T>, E>;
    type IntoFuture = FlowFuture<Option<T>, E>;

    fn into_future(self) -> Self::IntoFuture {
        let (flow, steps) = self.into_parts();
        flow.serial_future(steps)
    }
}

fn spawn_resolve<T, E, Fut>(future: Fut, done: Done<T, E>)
where
    T: Send + 'static,
    E: Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
{
    tokio::spawn(future.map(move |result| done.resolve(result)));
}

/// Lift a future into a zero-argument [`Task`]
///
/// The future is spawned on the current tokio runtime when the task is
/// invoked. If it panics, its completion signal is dropped and the run is
/// abandoned.
///
/// # Panics
///
/// The returned task panics if invoked outside a tokio runtime.
pub fn task_from_future<T, E, Fut>(future: Fut) -> Task<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
{
    Box::new(move |done| spawn_resolve(future, done))
}

/// Lift an async function of the previous value into a [`Step`]
///
/// # Panics
///
/// The returned step panics if invoked outside a tokio runtime.
pub fn step_from_future<T, E, G, Fut>(f: G) -> Step<T, E>
where
    T: Send + 'static,
    E: Send + 'static,
    G: FnOnce(Option<T>) -> Fut + Send + 'static,
    Fut: Future<Output = std::result::Result<T, E>> + Send + 'static,
{
    Box::new(move |input, done| spawn_resolve(f(input), done))
}
