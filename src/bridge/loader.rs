//! Single-flight initialization.
//!
//! The first caller runs the initializer; callers arriving while it runs
//! queue up and receive the same outcome. A failure resets the cell so a
//! later call may try again.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};

use tokio::sync::oneshot;

use crate::errors::BridgeError;
use crate::log::{debug, warn};

type Waiter<T> = oneshot::Sender<Result<T, BridgeError>>;

enum State<T> {
    Idle,
    Loading(Vec<Waiter<T>>),
    Ready(T),
}

/// A value initialized at most once at a time by an async loader
pub struct SingleFlight<T> {
    state: Mutex<State<T>>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        SingleFlight {
            state: Mutex::new(State::Idle),
        }
    }
}

impl<T> std::fmt::Debug for SingleFlight<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match &*self.lock() {
            State::Idle => "idle",
            State::Loading(_) => "loading",
            State::Ready(_) => "ready",
        };
        f.debug_struct("SingleFlight").field("state", &state).finish()
    }
}

enum Role<T> {
    Done(T),
    Wait(oneshot::Receiver<Result<T, BridgeError>>),
    Load,
}

impl<T> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State<T>> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl<T: Clone> SingleFlight<T> {
    /// The initialized value, if loading already succeeded
    pub fn get(&self) -> Option<T> {
        match &*self.lock() {
            State::Ready(value) => Some(value.clone()),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(&*self.lock(), State::Loading(_))
    }

    /// Return the value, running `init` if nobody has produced it yet.
    pub async fn get_or_init<F, Fut>(&self, init: F) -> Result<T, BridgeError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, BridgeError>>,
    {
        let role = {
            let mut state = self.lock();
            match &mut *state {
                State::Ready(value) => Role::Done(value.clone()),
                State::Loading(waiters) => {
                    let (tx, rx) = oneshot::channel();
                    waiters.push(tx);
                    Role::Wait(rx)
                }
                State::Idle => {
                    *state = State::Loading(Vec::new());
                    Role::Load
                }
            }
        };

        match role {
            Role::Done(value) => Ok(value),
            Role::Wait(rx) => {
                debug!("waiting for pending initialization");
                rx.await.unwrap_or(Err(BridgeError::Abandoned))
            }
            Role::Load => {
                debug!("starting initialization");
                let guard = LoadGuard { cell: self, armed: true };
                let result = init().await;
                guard.finish(&result);
                result
            }
        }
    }
}

/// Resolves the waiters of a load, also when the loading future is dropped.
struct LoadGuard<'a, T: Clone> {
    cell: &'a SingleFlight<T>,
    armed: bool,
}

impl<T: Clone> LoadGuard<'_, T> {
    fn finish(mut self, result: &Result<T, BridgeError>) {
        self.armed = false;
        let next = match result {
            Ok(value) => State::Ready(value.clone()),
            Err(_) => State::Idle,
        };
        let previous = std::mem::replace(&mut *self.cell.lock(), next);
        if let State::Loading(waiters) = previous {
            debug!(waiters = waiters.len(), ok = result.is_ok(), "initialization finished");
            for waiter in waiters {
                let _ = waiter.send(result.clone());
            }
        }
    }
}

impl<T: Clone> Drop for LoadGuard<'_, T> {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        warn!("initialization abandoned");
        let previous = std::mem::replace(&mut *self.cell.lock(), State::Idle);
        if let State::Loading(waiters) = previous {
            for waiter in waiters {
                let _ = waiter.send(Err(BridgeError::Abandoned));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn concurrent_callers_share_one_load() {
        let cell = SingleFlight::<u32>::new();
        let calls = AtomicUsize::new(0);
        let counter = &calls;
        let init = move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            Ok(7)
        };

        let (a, b, c) = tokio::join!(
            cell.get_or_init(init),
            cell.get_or_init(init),
            cell.get_or_init(init)
        );
        assert_eq!((a, b, c), (Ok(7), Ok(7), Ok(7)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(cell.get(), Some(7));

        assert_eq!(cell.get_or_init(init).await, Ok(7));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn failure_reaches_every_waiter_and_allows_retry() {
        let cell = SingleFlight::<u32>::new();
        let failing = || async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err(BridgeError::Load {
                message: "no script".into(),
            })
        };
        let (a, b) = tokio::join!(cell.get_or_init(failing), cell.get_or_init(failing));
        assert!(matches!(a, Err(BridgeError::Load { .. })));
        assert_eq!(a, b);
        assert!(!cell.is_loading());

        assert_eq!(cell.get_or_init(|| async { Ok(3) }).await, Ok(3));
    }

    #[tokio::test]
    async fn dropped_loader_releases_waiters() {
        let cell = Arc::new(SingleFlight::<u32>::new());

        let loader = {
            let cell = cell.clone();
            tokio::spawn(async move {
                cell.get_or_init(|| std::future::pending::<Result<u32, BridgeError>>())
                    .await
            })
        };
        while !cell.is_loading() {
            tokio::task::yield_now().await;
        }

        let waiter = {
            let cell = cell.clone();
            tokio::spawn(async move { cell.get_or_init(|| async { Ok(1) }).await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;

        loader.abort();
        assert_eq!(waiter.await.unwrap(), Err(BridgeError::Abandoned));
        assert!(!cell.is_loading());
    }
}
