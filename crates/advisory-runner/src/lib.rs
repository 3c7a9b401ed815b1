//! A concurrent application runner that manages long-running worker
//! processes with graceful shutdown.
//!
//! The runner spawns named worker processes concurrently, cancels them all
//! when a shutdown signal (SIGTERM/SIGINT) arrives or any worker fails, and
//! then executes cleanup closers under a timeout.
//!
//! # Example
//!
//! ```no_run
//! use advisory_runner::Runner;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let runner = Runner::new()
//!         .with_named_process("heartbeat", |ctx| async move {
//!             loop {
//!                 tokio::select! {
//!                     _ = ctx.cancelled() => {
//!                         tracing::info!("heartbeat stopping");
//!                         break;
//!                     }
//!                     _ = tokio::time::sleep(Duration::from_secs(1)) => {}
//!                 }
//!             }
//!             Ok(())
//!         })
//!         .with_closer(|| async move {
//!             tracing::info!("cleaning up resources");
//!             Ok(())
//!         })
//!         .with_closer_timeout(Duration::from_secs(5));
//!
//!     runner.run().await;
//! }
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

/// A worker process function. Takes a cancellation token and resolves when
/// the worker has drained and stopped.
pub type Process =
    Box<dyn FnOnce(CancellationToken) -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>> + Send>;

/// A cleanup function executed after all worker processes have stopped.
pub type Closer = Box<dyn FnOnce() -> Pin<Box<dyn Future<Output = Result<(), anyhow::Error>> + Send>> + Send>;

/// Orchestrates named worker processes and cleanup functions.
///
/// - Worker processes run concurrently until one fails or a shutdown signal
///   is received
/// - Closers execute afterward, regardless of worker outcome
/// - A worker error exits the application with code 1 after cleanup
pub struct Runner {
    processes: Vec<(String, Process)>,
    closers: Vec<Closer>,
    closer_timeout: Duration,
    cancellation_token: CancellationToken,
}

impl Default for Runner {
    fn default() -> Self {
        Self::new()
    }
}

impl Runner {
    pub fn new() -> Self {
        Self {
            processes: Vec::new(),
            closers: Vec::new(),
            closer_timeout: Duration::from_secs(10),
            cancellation_token: CancellationToken::new(),
        }
    }

    /// Adds a named worker process. The name appears in shutdown and
    /// failure logs.
    pub fn with_named_process<F, Fut>(mut self, name: impl Into<String>, process: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.processes
            .push((name.into(), Box::new(|token| Box::pin(process(token)))));
        self
    }

    /// Adds a cleanup closer. Closers run after every worker has stopped;
    /// all closers attempt to execute even if some fail.
    pub fn with_closer<F, Fut>(mut self, closer: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), anyhow::Error>> + Send + 'static,
    {
        self.closers.push(Box::new(|| Box::pin(closer())));
        self
    }

    /// Sets the timeout for executing closers. Default is 10 seconds.
    pub fn with_closer_timeout(mut self, timeout: Duration) -> Self {
        self.closer_timeout = timeout;
        self
    }

    /// Sets a custom cancellation token for external shutdown control.
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = token;
        self
    }

    /// Runs all worker processes and waits for completion or a shutdown
    /// signal, then executes closers and exits the application.
    pub async fn run(self) {
        let token = Arc::new(self.cancellation_token);
        let mut join_set = JoinSet::new();
        let closer_timeout = self.closer_timeout;
        let closers = self.closers;

        for (name, process) in self.processes {
            let process_token = token.clone();
            join_set.spawn(async move {
                let result = process((*process_token).clone()).await;
                (name, result)
            });
        }

        let signal_token = token.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!("received shutdown signal");
                    signal_token.cancel();
                }
                Err(err) => {
                    tracing::error!("error setting up signal handler: {}", err);
                }
            }
        });

        #[cfg(unix)]
        {
            let sigterm_token = token.clone();
            tokio::spawn(async move {
                use tokio::signal::unix::{signal, SignalKind};
                let mut sigterm = match signal(SignalKind::terminate()) {
                    Ok(sigterm) => sigterm,
                    Err(err) => {
                        tracing::error!("error setting up SIGTERM handler: {}", err);
                        return;
                    }
                };
                sigterm.recv().await;
                tracing::info!("received SIGTERM signal");
                sigterm_token.cancel();
            });
        }

        let mut first_error = None;
        while let Some(result) = join_set.join_next().await {
            match result {
                Ok((name, Ok(()))) => {
                    tracing::debug!(process = %name, "worker process completed");
                }
                Ok((name, Err(err))) => {
                    if !token.is_cancelled() {
                        tracing::error!(process = %name, "worker process error: {:#}", err);
                        first_error = Some(err);
                        token.cancel();
                    }
                }
                Err(err) => {
                    tracing::error!("worker process panicked: {}", err);
                    if !token.is_cancelled() {
                        token.cancel();
                    }
                }
            }

            if token.is_cancelled() {
                break;
            }
        }

        // Let the remaining workers observe the cancellation and drain
        join_set.shutdown().await;

        if !closers.is_empty() {
            tracing::info!("running closers with timeout of {:?}", closer_timeout);

            let closer_result =
                tokio::time::timeout(closer_timeout, Self::run_closers(closers)).await;

            match closer_result {
                Ok(_) => {
                    tracing::info!("all closers completed");
                }
                Err(_) => {
                    tracing::error!("closers timed out after {:?}", closer_timeout);
                }
            }
        }

        if let Some(err) = first_error {
            tracing::error!("application exiting with error: {:#}", err);
            std::process::exit(1);
        } else {
            tracing::info!("application exiting normally");
            std::process::exit(0);
        }
    }

    async fn run_closers(closers: Vec<Closer>) {
        let mut closer_set = JoinSet::new();

        for closer in closers {
            closer_set.spawn(async move { closer().await });
        }

        while let Some(result) = closer_set.join_next().await {
            match result {
                Ok(Ok(())) => {
                    tracing::debug!("closer completed");
                }
                Ok(Err(err)) => {
                    tracing::error!("closer error: {:#}", err);
                }
                Err(err) => {
                    tracing::error!("closer panicked: {}", err);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_closers_all_execute() {
        let counter = Arc::new(AtomicUsize::new(0));
        let first = counter.clone();
        let second = counter.clone();

        let runner = Runner::new()
            .with_closer(move || {
                let c = first.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .with_closer(move || {
                let c = second.clone();
                async move {
                    c.fetch_add(1, Ordering::SeqCst);
                    anyhow::bail!("cleanup failed")
                }
            })
            .with_closer_timeout(Duration::from_secs(1));

        Runner::run_closers(runner.closers).await;

        assert_eq!(counter.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_named_process_observes_cancellation() {
        let token = CancellationToken::new();
        let stopped = Arc::new(AtomicUsize::new(0));
        let stopped_clone = stopped.clone();

        let runner = Runner::new()
            .with_named_process("worker", move |ctx| {
                let stopped = stopped_clone.clone();
                async move {
                    ctx.cancelled().await;
                    stopped.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }
            })
            .with_cancellation_token(token.clone());

        let (name, process) = runner.processes.into_iter().next().unwrap();
        assert_eq!(name, "worker");

        let handle = tokio::spawn(process(token.clone()));
        token.cancel();
        handle.await.unwrap().unwrap();

        assert_eq!(stopped.load(Ordering::SeqCst), 1);
    }
}
