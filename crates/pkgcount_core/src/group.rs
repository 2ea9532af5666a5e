//! Fan-out/fan-in over a shared accumulator.
//!
//! A [`ResultGroup`] owns an accumulator for the duration of a fan-out. Each
//! unit scheduled with [`ResultGroup::go`] runs on the rayon pool against a
//! shared reference to it, so the accumulator must do its own interior
//! synchronization (see [`crate::Tally`]). [`ResultGroup::wait`] joins every
//! unit and hands the accumulator back, or reports the first failure.

use log::{debug, trace};
use std::{
    error, fmt,
    sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError},
};

use crate::cancel::CancellationToken;

#[derive(Debug)]
pub enum GroupError<E> {
    /// The first unit to fail, in completion order.
    Failed(E),
    /// The group's token was cancelled from outside before all work ran.
    Cancelled,
    /// The accumulator was still referenced after every unit finished.
    Detached,
}

impl<E: fmt::Display> fmt::Display for GroupError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupError::Failed(e) => write!(f, "unit of work failed: {e}"),
            GroupError::Cancelled => f.write_str("group cancelled before completion"),
            GroupError::Detached => f.write_str("accumulator still shared after join"),
        }
    }
}

impl<E: error::Error + 'static> error::Error for GroupError<E> {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            GroupError::Failed(e) => Some(e),
            _ => None,
        }
    }
}

struct State<E> {
    pending: Mutex<usize>,
    idle: Condvar,
    first_error: Mutex<Option<E>>,
}

/// Decrements the pending count when a unit finishes, including by panic.
struct Completion<E> {
    state: Arc<State<E>>,
}

impl<E> Drop for Completion<E> {
    fn drop(&mut self) {
        let mut pending = lock(&self.state.pending);
        *pending -= 1;
        if *pending == 0 {
            self.state.idle.notify_all();
        }
    }
}

pub struct ResultGroup<T, E> {
    target: Arc<T>,
    state: Arc<State<E>>,
    token: CancellationToken,
    scheduled: usize,
}

impl<T, E> ResultGroup<T, E>
where
    T: Send + Sync + 'static,
    E: Send + 'static,
{
    /// Creates a group owning `init` and a token derived from `parent`.
    ///
    /// The returned token is cancelled when any unit fails or `parent` is
    /// cancelled.
    pub fn new(parent: &CancellationToken, init: T) -> (Self, CancellationToken) {
        let token = parent.child();
        let group = ResultGroup {
            target: Arc::new(init),
            state: Arc::new(State {
                pending: Mutex::new(0),
                idle: Condvar::new(),
                first_error: Mutex::new(None),
            }),
            token: token.clone(),
            scheduled: 0,
        };
        (group, token)
    }

    /// Schedules one unit. Units that start after cancellation are skipped.
    pub fn go<F>(&mut self, unit: F)
    where
        F: FnOnce(&T, &CancellationToken) -> Result<(), E> + Send + 'static,
    {
        self.scheduled += 1;
        *lock(&self.state.pending) += 1;

        let done = Completion { state: Arc::clone(&self.state) };
        let target = Arc::clone(&self.target);
        let token = self.token.clone();

        rayon::spawn(move || {
            // Locals drop in reverse order: `target` is released before
            // `done` signals, so `wait` can reclaim the accumulator.
            let done = done;
            let target = target;

            if token.is_cancelled() {
                trace!("Skipping unit, group already cancelled");
                return;
            }
            if let Err(e) = unit(&target, &token) {
                let mut first = lock(&done.state.first_error);
                if first.is_none() {
                    debug!("First unit failure recorded, cancelling group");
                    *first = Some(e);
                    token.cancel();
                }
            }
        });
    }

    /// Cancels outstanding units without waiting for them.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Number of units scheduled so far.
    pub fn scheduled(&self) -> usize {
        self.scheduled
    }

    /// Blocks until every scheduled unit has finished.
    ///
    /// Must not be called from a rayon worker thread: the joining thread
    /// blocks and would starve the pool it is waiting on.
    pub fn wait(self) -> Result<T, GroupError<E>> {
        let ResultGroup { target, state, token, scheduled } = self;

        if scheduled == 0 {
            trace!("No units scheduled, returning initial accumulator");
            return Arc::into_inner(target).ok_or(GroupError::Detached);
        }

        {
            let mut pending = lock(&state.pending);
            while *pending > 0 {
                pending = state.idle.wait(pending).unwrap_or_else(PoisonError::into_inner);
            }
        }
        debug!("Joined {} units", scheduled);

        let first_error = lock(&state.first_error).take();
        let cancelled = token.is_cancelled();
        // Releases anything still observing the token once the group is done.
        token.cancel();

        if let Some(e) = first_error {
            return Err(GroupError::Failed(e));
        }
        if cancelled {
            return Err(GroupError::Cancelled);
        }
        Arc::into_inner(target).ok_or(GroupError::Detached)
    }
}

fn lock<V>(m: &Mutex<V>) -> MutexGuard<'_, V> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{
        io,
        sync::atomic::{AtomicUsize, Ordering},
        thread,
        time::{Duration, Instant},
    };

    #[test]
    fn test_wait_without_units_returns_initial() {
        let parent = CancellationToken::new();
        let (group, _token) = ResultGroup::<Vec<u32>, io::Error>::new(&parent, vec![1, 2, 3]);
        let acc = group.wait().unwrap();
        assert_eq!(acc, vec![1, 2, 3]);
    }

    #[test]
    fn test_all_units_mutate_accumulator() {
        let parent = CancellationToken::new();
        let (mut group, _token) =
            ResultGroup::<AtomicUsize, io::Error>::new(&parent, AtomicUsize::new(0));

        for i in 1..=100 {
            group.go(move |acc, _| {
                acc.fetch_add(i, Ordering::Relaxed);
                Ok(())
            });
        }
        assert_eq!(group.scheduled(), 100);

        let acc = group.wait().unwrap();
        assert_eq!(acc.into_inner(), 5050);
    }

    #[test]
    fn test_first_error_is_returned_once() {
        let parent = CancellationToken::new();
        let (mut group, token) = ResultGroup::<AtomicUsize, String>::new(&parent, AtomicUsize::new(0));

        for i in 0..20 {
            group.go(move |_, _| if i % 2 == 0 { Err(format!("unit {i} failed")) } else { Ok(()) });
        }

        match group.wait() {
            Err(GroupError::Failed(msg)) => assert!(msg.starts_with("unit ")),
            other => panic!("expected a unit failure, got {:?}", other.map(|a| a.into_inner())),
        }
        assert!(token.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_failure_cancels_outstanding_units() {
        let parent = CancellationToken::new();
        let (mut group, _token) =
            ResultGroup::<AtomicUsize, String>::new(&parent, AtomicUsize::new(0));

        group.go(|_, _| Err("boom".to_string()));
        for _ in 0..64 {
            group.go(|finished, token| {
                // Long unit that checks the token between steps
                for _ in 0..200 {
                    if token.is_cancelled() {
                        return Ok(());
                    }
                    thread::sleep(Duration::from_millis(5));
                }
                finished.fetch_add(1, Ordering::Relaxed);
                Ok(())
            });
        }

        let start = Instant::now();
        let result = group.wait();
        // 64 units at 1s each would take far longer than this on any pool size
        assert!(start.elapsed() < Duration::from_secs(5));
        assert!(matches!(result, Err(GroupError::Failed(ref m)) if m == "boom"));
    }

    #[test]
    fn test_parent_cancel_yields_cancelled() {
        let parent = CancellationToken::new();
        let (mut group, token) =
            ResultGroup::<AtomicUsize, io::Error>::new(&parent, AtomicUsize::new(0));

        parent.cancel();
        assert!(token.is_cancelled());
        group.go(|acc, _| {
            acc.fetch_add(1, Ordering::Relaxed);
            Ok(())
        });

        assert!(matches!(group.wait(), Err(GroupError::Cancelled)));
    }

    #[test]
    fn test_group_error_display_and_source() {
        let err: GroupError<io::Error> =
            GroupError::Failed(io::Error::new(io::ErrorKind::NotFound, "missing.go"));
        assert!(err.to_string().contains("missing.go"));
        assert!(error::Error::source(&err).is_some());
        assert!(error::Error::source(&GroupError::<io::Error>::Cancelled).is_none());
    }
}
