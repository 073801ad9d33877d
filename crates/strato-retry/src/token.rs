use std::future::Future;

use strato_core::{BoxFuture, RemoteError};

/// Source of the backing service's current change token.
///
/// A token is fetched immediately before each mutation attempt and never
/// cached across attempts or resources: any concurrent mutation, including
/// one issued by another client, invalidates an outstanding token, which the
/// service reports as a stale-token conflict at call time.
pub trait TokenSource: Send + Sync {
    fn change_token(&self) -> BoxFuture<'_, Result<String, RemoteError>>;
}

/// Default bound on fetch-then-call attempts per mutation.
pub const DEFAULT_TOKEN_ATTEMPTS: u32 = 5;

/// Serializes mutating calls against a service that models all mutations as
/// a single token-guarded queue.
///
/// Generic over what the mutation does: the wrapper only knows the
/// fetch-token / call / retry-on-stale contract.
pub struct ChangeTokenMutator<S> {
    source: S,
    max_attempts: u32,
}

impl<S: TokenSource> ChangeTokenMutator<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            max_attempts: DEFAULT_TOKEN_ATTEMPTS,
        }
    }

    /// Overrides the stale-token retry budget. Different call sites tolerate
    /// different bounds; unbounded retry risks livelock under contention.
    pub fn max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    /// Fetches a fresh token and invokes `attempt` with it, repeating the
    /// fetch-then-call sequence on stale-token conflicts up to the configured
    /// bound. Any other error, including a token fetch failure, returns
    /// immediately. Exhausting the bound converts the conflict into a
    /// generic failure carrying the attempt count.
    pub async fn run<T, F, Fut>(&self, mut attempt: F) -> Result<T, RemoteError>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T, RemoteError>>,
    {
        let mut detail = String::new();
        for n in 1..=self.max_attempts {
            let token = self.source.change_token().await?;
            match attempt(token).await {
                Ok(out) => return Ok(out),
                Err(RemoteError::StaleToken(d)) => {
                    tracing::debug!(
                        attempt = n,
                        max = self.max_attempts,
                        "change token went stale, refetching"
                    );
                    detail = d;
                }
                Err(err) => return Err(err),
            }
        }

        Err(RemoteError::other(
            "mutation",
            format!(
                "change token still stale after {} attempts: {detail}",
                self.max_attempts
            ),
        ))
    }
}
