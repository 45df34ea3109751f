// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! One-shot static initialization guard.
//!
//! Models the JVM class-initialization protocol (JVMS §5.5) for a single
//! value:
//!
//! ```text
//! Uninitialized ──trigger──▶ Initializing ──ok──▶ Ready
//!                                  │
//!                                  └──err/panic──▶ Failed
//! ```
//!
//! Exactly one thread runs the initializer. Other threads that trigger while
//! it runs block until it finishes and then see the same outcome. `Ready`
//! and `Failed` are terminal.

use std::borrow::Cow;
use std::sync::OnceLock;
use std::thread::{self, ThreadId};

use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::error::InitError;

/// Observable phase of an [`InitOnce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitState {
    /// No trigger has happened yet
    Uninitialized,
    /// An initializer is running
    Initializing,
    /// The value is bound and visible
    Ready,
    /// The initializer failed; permanent
    Failed,
}

#[derive(Debug)]
enum Phase {
    Uninitialized,
    Initializing(ThreadId),
    Ready,
    Failed(InitError),
}

/// Initialize-once cell with blocking waiters and sticky failure.
///
/// `const`-constructible so it can back a `static`.
pub struct InitOnce<T> {
    target: Cow<'static, str>,
    value: OnceLock<T>,
    phase: Mutex<Phase>,
    done: Condvar,
}

impl<T> InitOnce<T> {
    /// Creates an uninitialized guard. `target` names the value in errors
    /// and logs (usually the owning class).
    pub const fn new(target: &'static str) -> Self {
        Self {
            target: Cow::Borrowed(target),
            value: OnceLock::new(),
            phase: Mutex::new(Phase::Uninitialized),
            done: Condvar::new(),
        }
    }

    /// Creates an uninitialized guard for a runtime-named target.
    pub fn named(target: impl Into<String>) -> Self {
        Self {
            target: Cow::Owned(target.into()),
            value: OnceLock::new(),
            phase: Mutex::new(Phase::Uninitialized),
            done: Condvar::new(),
        }
    }

    /// Name used in errors and logs.
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Current phase.
    pub fn state(&self) -> InitState {
        if self.value.get().is_some() {
            return InitState::Ready;
        }
        match *self.phase.lock() {
            Phase::Uninitialized => InitState::Uninitialized,
            Phase::Initializing(_) => InitState::Initializing,
            Phase::Ready => InitState::Ready,
            Phase::Failed(_) => InitState::Failed,
        }
    }

    /// Returns true while the calling thread is running the initializer.
    pub fn is_initializing_thread(&self) -> bool {
        matches!(*self.phase.lock(), Phase::Initializing(owner) if owner == thread::current().id())
    }

    /// Returns the value if initialization already completed.
    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    /// Returns the value, running `init` first if nobody has yet.
    ///
    /// Blocks while another thread is initializing. A trigger from the
    /// initializing thread itself fails with [`InitError::Reentrant`]
    /// instead of exposing a half-built value.
    pub fn get_or_try_init<E, F>(&self, init: F) -> Result<&T, InitError>
    where
        F: FnOnce() -> Result<T, E>,
        E: std::fmt::Display,
    {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }

        let me = thread::current().id();
        {
            let mut phase = self.phase.lock();
            loop {
                match &*phase {
                    Phase::Ready => return Ok(self.ready_value()),
                    Phase::Failed(err) => return Err(err.clone()),
                    Phase::Initializing(owner) if *owner == me => {
                        return Err(InitError::Reentrant(self.target.to_string()));
                    }
                    Phase::Initializing(_) => self.done.wait(&mut phase),
                    Phase::Uninitialized => break,
                }
            }
            *phase = Phase::Initializing(me);
        }
        debug!(class = %self.target, "static initialization started");

        // Runs the initializer without holding the lock; if it unwinds, the
        // guard's Drop publishes a Failed phase so waiters do not hang.
        let mut guard = Completion {
            cell: self,
            outcome: None,
        };
        let outcome = match init() {
            Ok(value) => {
                // Only the Initializing owner reaches this point.
                let _ = self.value.set(value);
                Ok(())
            }
            Err(err) => Err(InitError::Failed {
                target: self.target.to_string(),
                reason: err.to_string(),
            }),
        };
        guard.outcome = Some(outcome.clone());
        drop(guard);

        match outcome {
            Ok(()) => Ok(self.ready_value()),
            Err(err) => Err(err),
        }
    }

    /// Returns the value, running an infallible `init` first if needed.
    pub fn get_or_init<F>(&self, init: F) -> Result<&T, InitError>
    where
        F: FnOnce() -> T,
    {
        self.get_or_try_init(|| Ok::<T, std::convert::Infallible>(init()))
    }

    fn ready_value(&self) -> &T {
        match self.value.get() {
            Some(value) => value,
            // Phase::Ready is only published after the value is set.
            None => unreachable!("{} marked ready without a value", self.target),
        }
    }

    fn finish(&self, outcome: Option<Result<(), InitError>>) {
        let mut phase = self.phase.lock();
        *phase = match outcome {
            Some(Ok(())) => {
                debug!(class = %self.target, "static initialization completed");
                Phase::Ready
            }
            Some(Err(err)) => {
                warn!(class = %self.target, error = %err, "static initialization failed");
                Phase::Failed(err)
            }
            None => {
                warn!(class = %self.target, "static initializer panicked");
                Phase::Failed(InitError::Panicked(self.target.to_string()))
            }
        };
        self.done.notify_all();
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for InitOnce<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InitOnce")
            .field("target", &self.target)
            .field("state", &self.state())
            .field("value", &self.value.get())
            .finish()
    }
}

struct Completion<'a, T> {
    cell: &'a InitOnce<T>,
    outcome: Option<Result<(), InitError>>,
}

impl<T> Drop for Completion<'_, T> {
    fn drop(&mut self) {
        self.cell.finish(self.outcome.take());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    #[test]
    fn test_starts_uninitialized() {
        let cell: InitOnce<u32> = InitOnce::new("test/Holder");
        assert_eq!(cell.state(), InitState::Uninitialized);
        assert!(cell.get().is_none());
    }

    #[test]
    fn test_initializes_once() {
        let cell = InitOnce::new("test/Holder");
        let runs = AtomicUsize::new(0);

        for _ in 0..3 {
            let value = cell
                .get_or_init(|| {
                    runs.fetch_add(1, Ordering::SeqCst);
                    42
                })
                .unwrap();
            assert_eq!(*value, 42);
        }

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert_eq!(cell.state(), InitState::Ready);
    }

    #[test]
    fn test_failure_is_sticky() {
        let cell: InitOnce<u32> = InitOnce::new("test/Broken");

        let first = cell.get_or_try_init(|| Err("sink unavailable")).unwrap_err();
        assert_eq!(
            first,
            InitError::Failed {
                target: "test/Broken".to_string(),
                reason: "sink unavailable".to_string(),
            }
        );
        assert_eq!(cell.state(), InitState::Failed);

        // No retry: a later trigger with a working initializer sees the same error.
        let second = cell.get_or_init(|| 7).unwrap_err();
        assert_eq!(first, second);
        assert!(cell.get().is_none());
    }

    #[test]
    fn test_panic_marks_failed() {
        let cell: Arc<InitOnce<u32>> = Arc::new(InitOnce::new("test/Panics"));
        let worker = Arc::clone(&cell);
        let joined = thread::spawn(move || {
            let _ = worker.get_or_init(|| panic!("boom"));
        })
        .join();
        assert!(joined.is_err());

        assert_eq!(cell.state(), InitState::Failed);
        assert_eq!(
            cell.get_or_init(|| 1).unwrap_err(),
            InitError::Panicked("test/Panics".to_string())
        );
    }

    #[test]
    fn test_reentrant_trigger_is_rejected() {
        let cell: InitOnce<u32> = InitOnce::new("test/Cycle");
        let inner = cell.get_or_try_init(|| match cell.get_or_init(|| 1) {
            Ok(_) => Ok(2),
            Err(err) => Err(err),
        });

        assert_eq!(
            inner.unwrap_err(),
            InitError::Failed {
                target: "test/Cycle".to_string(),
                reason: "recursive initialization of test/Cycle".to_string(),
            }
        );
    }

    #[test]
    fn test_initializing_thread_is_tracked() {
        let cell: InitOnce<bool> = InitOnce::new("test/Owner");
        assert!(!cell.is_initializing_thread());

        let inside = *cell
            .get_or_init(|| {
                let other = thread::scope(|s| s.spawn(|| cell.is_initializing_thread()).join());
                cell.is_initializing_thread() && !other.unwrap()
            })
            .unwrap();
        assert!(inside);
        assert!(!cell.is_initializing_thread());
    }

    #[test]
    fn test_concurrent_triggers_construct_once() {
        const THREADS: usize = 16;

        let cell: InitOnce<usize> = InitOnce::new("test/Shared");
        let runs = AtomicUsize::new(0);
        let barrier = Barrier::new(THREADS);

        let seen: Vec<usize> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        let value = cell
                            .get_or_init(|| {
                                runs.fetch_add(1, Ordering::SeqCst);
                                thread::sleep(std::time::Duration::from_millis(20));
                                99
                            })
                            .unwrap();
                        value as *const usize as usize
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(runs.load(Ordering::SeqCst), 1);
        assert!(seen.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(cell.get(), Some(&99));
    }

    #[test]
    fn test_concurrent_waiters_share_failure() {
        const THREADS: usize = 8;

        let cell: InitOnce<u8> = InitOnce::new("test/SharedFailure");
        let barrier = Barrier::new(THREADS);

        let errors: Vec<InitError> = thread::scope(|s| {
            let handles: Vec<_> = (0..THREADS)
                .map(|_| {
                    s.spawn(|| {
                        barrier.wait();
                        cell.get_or_try_init(|| {
                            thread::sleep(std::time::Duration::from_millis(20));
                            Err("no console")
                        })
                        .unwrap_err()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert!(errors.windows(2).all(|w| w[0] == w[1]));
    }

    #[test]
    fn test_usable_as_static() {
        static GREETING: InitOnce<String> = InitOnce::new("test/Static");
        let first = GREETING.get_or_init(|| "hello".to_string()).unwrap();
        let second = GREETING.get_or_init(|| "ignored".to_string()).unwrap();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first, "hello");
    }
}
