//! Splash lock.
//!
//! While an intro sequence plays, navigation is locked. The lock is released
//! by whichever comes first: the collaborator's ready signal, or the safety
//! timeout. A collaborator that never signals (or goes away) cannot keep the
//! page stuck.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{info, warn};
use tokio::sync::{Notify, oneshot};
use tokio::task::JoinHandle;

use crate::core::state::NavContext;

/// Completes once the locking collaborator is done.
#[async_trait]
pub trait ReadySignal: Send {
    async fn ready(self: Box<Self>);
}

#[async_trait]
impl ReadySignal for Arc<Notify> {
    async fn ready(self: Box<Self>) {
        self.notified().await;
    }
}

#[async_trait]
impl ReadySignal for oneshot::Receiver<()> {
    async fn ready(self: Box<Self>) {
        if (*self).await.is_err() {
            warn!("Splash went away without signalling ready; waiting for timeout");
            std::future::pending::<()>().await;
        }
    }
}

/// How the lock was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockRelease {
    Ready,
    TimedOut,
}

/// Locks navigation and spawns the task that unlocks it.
pub fn engage_splash_lock(
    ctx: NavContext,
    signal: Box<dyn ReadySignal>,
    safety_timeout: Duration,
) -> JoinHandle<LockRelease> {
    ctx.state().set_locked(true);
    tokio::spawn(async move {
        let release = tokio::select! {
            _ = signal.ready() => LockRelease::Ready,
            _ = tokio::time::sleep(safety_timeout) => {
                warn!("Splash did not signal ready within {:?}; unlocking", safety_timeout);
                LockRelease::TimedOut
            }
        };
        ctx.unlock();
        info!("Splash lock released ({:?})", release);
        release
    })
}
