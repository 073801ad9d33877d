use std::future::Future;
use std::time::Duration;

use strato_core::RemoteError;
use tokio::time::{sleep, Instant};

/// Retries `operation` while it fails with a referential conflict.
///
/// Conflicts are retried every `poll_interval` until `deadline` elapses; the
/// loop then makes exactly one final attempt and returns whatever that
/// attempt yields, so callers always see the real underlying error rather
/// than a synthetic timeout. Any other error returns immediately.
///
/// The operation may itself wrap a `ChangeTokenMutator`: a referential
/// conflict is a cross-object constraint, not a token conflict, and the two
/// loops compose.
pub async fn retry_until<T, F, Fut>(
    deadline: Instant,
    poll_interval: Duration,
    mut operation: F,
) -> Result<T, RemoteError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, RemoteError>>,
{
    loop {
        match operation().await {
            Ok(out) => return Ok(out),
            Err(RemoteError::ReferentialConflict(detail)) => {
                if Instant::now() >= deadline {
                    tracing::debug!(%detail, "still referenced at deadline, making final attempt");
                    break;
                }
                tracing::debug!(%detail, wait = ?poll_interval, "still referenced, waiting");
                sleep(poll_interval).await;
            }
            Err(err) => return Err(err),
        }
    }

    operation().await
}
