//! Background repository load.
//!
//! The interactive shell starts the load on the tokio runtime and keeps
//! reading commands while it runs. Between commands it asks the task whether
//! the listing has arrived; `finish` blocks until it does.

use futures::FutureExt;
use tokio::task::{JoinError, JoinHandle};

use crate::github::RepoError;
use crate::repos::{self, RepoRequest, RepoSource, Repository};

/// What a finished load produced. `Err` means the task panicked or was aborted.
pub type LoadOutcome = Result<Result<Vec<Repository>, RepoError>, JoinError>;

/// At most one repository load in flight
#[derive(Default)]
pub struct RepoTask {
    handle: Option<JoinHandle<Result<Vec<Repository>, RepoError>>>,
}

impl RepoTask {
    /// Start loading `request` from `source`
    pub fn spawn<R>(source: R, request: RepoRequest) -> Self
    where
        R: RepoSource + Send + Sync + 'static,
    {
        tracing::debug!("Loading repositories for {} in the background", request.account);
        let handle =
            tokio::spawn(async move { repos::load_repositories(&source, &request).await });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.is_some()
    }

    /// The outcome if the load has finished; None while it is still running or
    /// after the outcome was already taken.
    pub fn try_finish(&mut self) -> Option<LoadOutcome> {
        let outcome = self.handle.as_mut()?.now_or_never()?;
        self.handle = None;
        Some(outcome)
    }

    /// Wait for the load to finish. None if nothing was running.
    pub async fn finish(&mut self) -> Option<LoadOutcome> {
        let handle = self.handle.take()?;
        Some(handle.await)
    }
}
