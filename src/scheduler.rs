//! Cancellable recurring callbacks.
//!
//! The display driver never sleeps itself; it asks a [`Scheduler`] to call it back
//! periodically and keeps the returned [`CancelToken`] to stop that later.

use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use log::debug;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::clock::ManualClock;

pub type TickCallback = Box<dyn FnMut() + Send + 'static>;

/// Handle identifying one scheduled recurring callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CancelToken(u64);

pub trait Scheduler: Send + Sync {
    /// Calls `callback` every `period` until the returned token is cancelled. The first call happens one period from now.
    fn schedule(&self, period: Duration, callback: TickCallback) -> CancelToken;

    /// Stops the callback. Cancelling an unknown or already cancelled token does nothing.
    fn cancel(&self, token: CancelToken);
}

/// Runs each schedule as a task on a tokio runtime. Cancellation aborts the task.
pub struct TokioScheduler {
    handle: Handle,
    next_id: AtomicU64,
    tasks: Mutex<HashMap<u64, JoinHandle<()>>>,
}

impl TokioScheduler {
    pub fn new(handle: Handle) -> Self {
        Self {
            handle,
            next_id: AtomicU64::new(1),
            tasks: Mutex::new(HashMap::new()),
        }
    }

    /// Binds to the runtime of the calling context, if there is one.
    pub fn current() -> Option<Self> {
        Handle::try_current().ok().map(Self::new)
    }

    pub fn active_count(&self) -> usize {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl Scheduler for TokioScheduler {
    fn schedule(&self, period: Duration, mut callback: TickCallback) -> CancelToken {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let task = self.handle.spawn(async move {
            loop {
                tokio::time::sleep(period).await;
                callback();
            }
        });
        self.tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, task);
        debug!("Scheduled tick {} every {:?}", id, period);
        CancelToken(id)
    }

    fn cancel(&self, token: CancelToken) {
        let task = self
            .tasks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&token.0);
        if let Some(task) = task {
            task.abort();
            debug!("Cancelled tick {}", token.0);
        }
    }
}

impl Drop for TokioScheduler {
    fn drop(&mut self) {
        let tasks = self.tasks.get_mut().unwrap_or_else(PoisonError::into_inner);
        for (_, task) in tasks.drain() {
            task.abort();
        }
    }
}

struct ManualTask {
    period: Duration,
    next_due: Duration,
    callback: Option<TickCallback>,
}

#[derive(Default)]
struct ManualState {
    next_id: u64,
    elapsed: Duration,
    tasks: BTreeMap<u64, ManualTask>,
}

/// Virtual-time scheduler. Nothing fires until [`ManualScheduler::advance`] is called,
/// which also moves the paired [`ManualClock`] to each due instant before firing.
#[derive(Clone)]
pub struct ManualScheduler {
    clock: ManualClock,
    state: Arc<Mutex<ManualState>>,
}

impl ManualScheduler {
    pub fn new(clock: ManualClock) -> Self {
        Self {
            clock,
            state: Arc::new(Mutex::new(ManualState::default())),
        }
    }

    pub fn clock(&self) -> &ManualClock {
        &self.clock
    }

    pub fn active_count(&self) -> usize {
        self.lock().tasks.len()
    }

    /// Moves virtual time forward by `by`, firing every callback that falls due on the way in time order.
    pub fn advance(&self, by: Duration) {
        let target = self.lock().elapsed + by;
        loop {
            let (id, due, mut callback) = {
                let mut state = self.lock();
                let next = state
                    .tasks
                    .iter()
                    .filter(|(_, task)| task.callback.is_some() && task.next_due <= target)
                    .min_by_key(|(id, task)| (task.next_due, **id))
                    .map(|(id, task)| (*id, task.next_due));
                let Some((id, due)) = next else {
                    break;
                };
                let step = due.saturating_sub(state.elapsed);
                state.elapsed = due;
                self.advance_clock(step);
                let Some(callback) = state.tasks.get_mut(&id).and_then(|task| task.callback.take())
                else {
                    break;
                };
                (id, due, callback)
            };

            callback();

            let mut state = self.lock();
            if let Some(task) = state.tasks.get_mut(&id) {
                task.next_due = due + task.period;
                task.callback = Some(callback);
            }
        }

        let mut state = self.lock();
        let step = target.saturating_sub(state.elapsed);
        state.elapsed = target;
        self.advance_clock(step);
    }

    fn advance_clock(&self, step: Duration) {
        if !step.is_zero() {
            self.clock
                .advance(chrono::Duration::milliseconds(step.as_millis() as i64));
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ManualState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, period: Duration, callback: TickCallback) -> CancelToken {
        let period = period.max(Duration::from_millis(1));
        let mut state = self.lock();
        state.next_id += 1;
        let id = state.next_id;
        let next_due = state.elapsed + period;
        state.tasks.insert(
            id,
            ManualTask {
                period,
                next_due,
                callback: Some(callback),
            },
        );
        CancelToken(id)
    }

    fn cancel(&self, token: CancelToken) {
        self.lock().tasks.remove(&token.0);
    }
}
