//! Fixed-count exponential backoff for session and auth lookups.
//!
//! Only errors that can clear up on their own (pool exhaustion, I/O, a
//! locked database file) are retried. Everything else is returned on the
//! first failure.

use std::{future::Future, time::Duration};

use actix_web::rt::time::sleep;
use log::warn;

/// Upper bound on attempts, whatever the configuration asks for.
pub const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.clamp(1, MAX_ATTEMPTS),
            base_delay,
        }
    }

    /// Delay before retry number `attempt` (1-based): base, 2x base, 4x base...
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

pub fn is_transient(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::PoolTimedOut | sqlx::Error::Io(_) => true,
        // SQLITE_BUSY / SQLITE_LOCKED
        sqlx::Error::Database(db) => matches!(db.code().as_deref(), Some("5") | Some("6")),
        _ => false,
    }
}

pub async fn with_backoff<T, F, Fut>(policy: &RetryPolicy, mut op: F) -> Result<T, sqlx::Error>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, sqlx::Error>>,
{
    let mut attempt = 1;

    loop {
        match op().await {
            Ok(value) => return Ok(value),
            Err(e) if attempt < policy.max_attempts && is_transient(&e) => {
                let delay = policy.delay_for(attempt);
                warn!("Attempt {attempt} failed ({e}), retrying in {delay:?}");
                sleep(delay).await;
                attempt += 1;
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, rc::Rc};

    use super::*;

    fn fast_policy(attempts: u32) -> RetryPolicy {
        RetryPolicy::new(attempts, Duration::from_millis(1))
    }

    #[test]
    fn delay_doubles_each_attempt() {
        let policy = RetryPolicy::new(3, Duration::from_millis(100));
        assert_eq!(policy.delay_for(1), Duration::from_millis(100));
        assert_eq!(policy.delay_for(2), Duration::from_millis(200));
        assert_eq!(policy.delay_for(3), Duration::from_millis(400));
    }

    #[test]
    fn zero_attempts_means_one() {
        assert_eq!(RetryPolicy::new(0, Duration::ZERO).max_attempts, 1);
    }

    #[test]
    fn attempts_are_capped() {
        assert_eq!(RetryPolicy::new(10, Duration::ZERO).max_attempts, MAX_ATTEMPTS);
    }

    #[actix_web::test]
    async fn transient_errors_are_retried_until_success() {
        let calls = Rc::new(Cell::new(0));

        let result = with_backoff(&fast_policy(3), || {
            let calls = calls.clone();
            async move {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(sqlx::Error::PoolTimedOut)
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert_eq!(result.unwrap(), 42);
        assert_eq!(calls.get(), 3);
    }

    #[actix_web::test]
    async fn gives_up_after_max_attempts() {
        let calls = Rc::new(Cell::new(0));

        let result: Result<(), _> = with_backoff(&fast_policy(3), || {
            let calls = calls.clone();
            async move {
                calls.set(calls.get() + 1);
                Err(sqlx::Error::PoolTimedOut)
            }
        })
        .await;

        assert!(matches!(result, Err(sqlx::Error::PoolTimedOut)));
        assert_eq!(calls.get(), 3);
    }

    #[actix_web::test]
    async fn permanent_errors_are_not_retried() {
        let calls = Rc::new(Cell::new(0));

        let result: Result<(), _> = with_backoff(&fast_policy(3), || {
            let calls = calls.clone();
            async move {
                calls.set(calls.get() + 1);
                Err(sqlx::Error::RowNotFound)
            }
        })
        .await;

        assert!(matches!(result, Err(sqlx::Error::RowNotFound)));
        assert_eq!(calls.get(), 1);
    }
}
