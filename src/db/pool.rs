//! Connection lifecycle: pool creation and the startup readiness phase.
//!
//! The pool is created lazily so the HTTP server can bind immediately; a
//! background task then pings the database until it answers, publishing its
//! progress through a [`watch`] channel that handlers and `/health` read.

use std::future::Future;
use std::time::Duration;

use serde::Serialize;
use sqlx::MySqlPool;
use sqlx::mysql::MySqlPoolOptions;
use tokio::sync::watch;
use tracing::{info, warn};

#[derive(Clone, Debug)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
}

impl Default for PoolSettings {
    fn default() -> Self {
        Self {
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
        }
    }
}

/// How often, and how many times, startup tries to reach the database.
#[derive(Clone, Debug, PartialEq)]
pub struct RetryPolicy {
    /// `None` retries forever.
    pub max_attempts: Option<u32>,
    pub delay: Duration,
}

impl RetryPolicy {
    fn exhausted(&self, attempt: u32) -> bool {
        self.max_attempts.is_some_and(|max| attempt >= max)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Readiness {
    Connecting { attempt: u32 },
    Ready,
    Failed { attempts: u32, reason: String },
}

impl Readiness {
    pub fn is_ready(&self) -> bool {
        matches!(self, Readiness::Ready)
    }
}

/// Create the pool without opening any connection yet.
///
/// Every checkout is validated before use, so a connection dropped by the
/// server is replaced transparently instead of failing the next request.
pub fn create_pool(database_url: &str, settings: &PoolSettings) -> Result<MySqlPool, sqlx::Error> {
    MySqlPoolOptions::new()
        .max_connections(settings.max_connections)
        .acquire_timeout(settings.acquire_timeout)
        .test_before_acquire(true)
        .connect_lazy(database_url)
}

pub async fn ping(pool: &MySqlPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Run `probe` until it succeeds or the policy gives up.
///
/// Returns the final state, which has also been published on `status`.
pub async fn wait_until_ready<F, Fut>(
    policy: &RetryPolicy,
    status: &watch::Sender<Readiness>,
    mut probe: F,
) -> Readiness
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), sqlx::Error>>,
{
    let mut attempt = 0;
    loop {
        attempt += 1;
        status.send_replace(Readiness::Connecting { attempt });

        match probe().await {
            Ok(()) => {
                info!("database connection established after {} attempt(s)", attempt);
                status.send_replace(Readiness::Ready);
                return Readiness::Ready;
            }
            Err(e) if policy.exhausted(attempt) => {
                tracing::error!("giving up on database after {} attempt(s): {}", attempt, e);
                let failed = Readiness::Failed {
                    attempts: attempt,
                    reason: e.to_string(),
                };
                status.send_replace(failed.clone());
                return failed;
            }
            Err(e) => {
                warn!(
                    "database connection attempt {} failed: {}; retrying in {:?}",
                    attempt, e, policy.delay
                );
                tokio::time::sleep(policy.delay).await;
            }
        }
    }
}
