//! Single-shot, cancellable delayed tasks.
//!
//! `DeferredTask::arm` spawns a tokio task that sleeps for the given delay and then runs
//! an action future. The handle exposes cooperative cancellation, a list of completion
//! observers, and an awaitable outcome. Callers that want follow-up work either chain it
//! inside the action future (it then shares the action's cancellation) or register an
//! observer; the primitive does not distinguish the two.
//!
//! Cancellation and the sleeping-to-running transition are decided under one lock, so a
//! `cancel` that returns `true` guarantees the action never starts. Once the action is
//! running, cancellation is only recorded.

use dioxus_logger::tracing;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;

/// Observer invoked once with the final outcome of a task.
type Observer<T> = Box<dyn FnOnce(&TaskOutcome<T>) + Send>;

/// How a deferred task ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome<T> {
    /// The action ran to completion and produced this value.
    Completed(T),
    /// The task was cancelled before its delay elapsed.
    Cancelled(String),
}

/// Lifecycle of a deferred task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Waiting for the delay to elapse.
    Sleeping,
    /// The action is executing; cancellation no longer prevents it.
    Running,
    /// The action finished.
    Completed,
    /// Cancelled before the action started.
    Cancelled,
}

struct Inner<T> {
    state: TaskState,
    cancel_reason: Option<String>,
    outcome: Option<Arc<TaskOutcome<T>>>,
    observers: Vec<Observer<T>>,
}

struct Shared<T> {
    inner: Mutex<Inner<T>>,
    cancel: watch::Sender<bool>,
    done: watch::Sender<bool>,
}

impl<T> Shared<T> {
    fn lock(&self) -> MutexGuard<'_, Inner<T>> {
        // Observers run outside the lock, so a poisoned guard still holds consistent state
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn finish(&self, outcome: TaskOutcome<T>) {
        let outcome = Arc::new(outcome);
        let observers = {
            let mut inner = self.lock();
            inner.state = match *outcome {
                TaskOutcome::Completed(_) => TaskState::Completed,
                TaskOutcome::Cancelled(_) => TaskState::Cancelled,
            };
            inner.outcome = Some(outcome.clone());
            std::mem::take(&mut inner.observers)
        };

        for observer in observers {
            observer(&outcome);
        }

        self.done.send_replace(true);
    }
}

/// Handle to a delayed action spawned on the tokio runtime.
///
/// Dropping the handle does not cancel the task.
pub struct DeferredTask<T> {
    shared: Arc<Shared<T>>,
}

impl<T: Send + Sync + 'static> DeferredTask<T> {
    /// Arms a task that runs `action` once `delay` has elapsed.
    ///
    /// Must be called from within a tokio runtime.
    ///
    /// # Arguments
    /// - `delay` - How long to sleep before starting the action
    /// - `action` - Produces the future to run; only invoked if the task is not cancelled
    ///
    /// # Returns
    /// - `DeferredTask<T>` - Handle for cancelling, observing, or awaiting the task
    pub fn arm<F, Fut>(delay: Duration, action: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: std::future::Future<Output = T> + Send + 'static,
    {
        let (cancel, mut cancel_rx) = watch::channel(false);
        let (done, _) = watch::channel(false);
        let shared = Arc::new(Shared {
            inner: Mutex::new(Inner {
                state: TaskState::Sleeping,
                cancel_reason: None,
                outcome: None,
                observers: Vec::new(),
            }),
            cancel,
            done,
        });

        let task_shared = shared.clone();
        tokio::spawn(async move {
            tokio::select! {
                biased;
                _ = cancel_rx.wait_for(|cancelled| *cancelled) => {}
                _ = tokio::time::sleep(delay) => {}
            }

            let cancelled = {
                let mut inner = task_shared.lock();
                match inner.cancel_reason.clone() {
                    Some(reason) => Some(reason),
                    None => {
                        inner.state = TaskState::Running;
                        None
                    }
                }
            };

            if let Some(reason) = cancelled {
                task_shared.finish(TaskOutcome::Cancelled(reason));
                return;
            }

            let value = action().await;
            task_shared.finish(TaskOutcome::Completed(value));
        });

        Self { shared }
    }

    /// Requests cancellation.
    ///
    /// # Arguments
    /// - `reason` - Recorded as the outcome when the action is prevented from running
    ///
    /// # Returns
    /// - `true` - The task was still sleeping; its action will never run
    /// - `false` - The action is already running or the task already finished
    pub fn cancel(&self, reason: impl Into<String>) -> bool {
        let reason = reason.into();
        let mut inner = self.shared.lock();

        match inner.state {
            TaskState::Sleeping => {
                if inner.cancel_reason.is_none() {
                    inner.cancel_reason = Some(reason);
                }
                drop(inner);
                self.shared.cancel.send_replace(true);
                true
            }
            TaskState::Running => {
                tracing::debug!(
                    "Deferred task already running, cancellation ignored: {}",
                    reason
                );
                false
            }
            TaskState::Completed | TaskState::Cancelled => false,
        }
    }

    /// Registers an observer called once with the final outcome.
    ///
    /// Observers registered after completion are called immediately on the calling
    /// thread. Observers must not block; spawn a task for async follow-up work.
    pub fn when_complete(&self, observer: impl FnOnce(&TaskOutcome<T>) + Send + 'static) {
        let mut inner = self.shared.lock();

        match inner.outcome.clone() {
            Some(outcome) => {
                drop(inner);
                observer(&outcome);
            }
            None => inner.observers.push(Box::new(observer)),
        }
    }

    /// Waits until the task completes or is cancelled.
    ///
    /// # Returns
    /// - `Arc<TaskOutcome<T>>` - The shared final outcome
    pub async fn outcome(&self) -> Arc<TaskOutcome<T>> {
        let mut done = self.shared.done.subscribe();
        // The sender lives in `shared`, which `self` keeps alive
        let _ = done.wait_for(|finished| *finished).await;

        match self.shared.lock().outcome.clone() {
            Some(outcome) => outcome,
            None => Arc::new(TaskOutcome::Cancelled("task vanished".to_string())),
        }
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TaskState {
        self.shared.lock().state
    }

    /// Whether the task has completed or been cancelled.
    pub fn is_finished(&self) -> bool {
        matches!(self.state(), TaskState::Completed | TaskState::Cancelled)
    }
}
