//! Error types for the future adapters
//!
//! The callback combinators never wrap task errors: a task's error payload
//! reaches the main callback exactly as the task reported it. `FlowError`
//! only appears on the `Future` surface, where a run can also end without
//! its main callback ever firing.

/// Errors produced when awaiting a flow through [`crate::FlowFuture`]
#[derive(Debug, thiserror::Error)]
pub enum FlowError<E> {
    /// A task reported an error; the payload is forwarded untouched
    #[error("task failed: {0}")]
    Task(E),
    /// Every completion signal of the run was dropped before the run finished
    #[error("flow abandoned: completion signals dropped before the run finished")]
    Abandoned,
}

impl<E> FlowError<E> {
    /// Returns the task error payload, if this error carries one
    pub fn into_task_error(self) -> Option<E> {
        match self {
            Self::Task(error) => Some(error),
            Self::Abandoned => None,
        }
    }

    /// `true` when the run was abandoned rather than failed by a task
    #[must_use]
    pub fn is_abandoned(&self) -> bool {
        matches!(self, Self::Abandoned)
    }
}

/// Result type for awaited flows
pub type Result<T, E> = std::result::Result<T, FlowError<E>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error: FlowError<&str> = FlowError::Task("boom");
        assert_eq!(error.to_string(), "task failed: boom");
        assert_eq!(
            FlowError::<&str>::Abandoned.to_string(),
            "flow abandoned: completion signals dropped before the run finished"
        );
    }

    #[test]
    fn test_into_task_error() {
        assert_eq!(FlowError::Task(7).into_task_error(), Some(7));
        assert_eq!(FlowError::<i32>::Abandoned.into_task_error(), None);
        assert!(FlowError::<i32>::Abandoned.is_abandoned());
        assert!(!FlowError::Task(1).is_abandoned());
    }
}
