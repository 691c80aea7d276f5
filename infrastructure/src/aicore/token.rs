//! OAuth access token cache.

use super::error::{AiCoreError, Result};
use super::protocol::TokenResponse;
use chrono::{DateTime, Duration, Utc};
use std::future::Future;
use tokio::sync::Mutex;
use tracing::debug;

/// Tokens are refreshed this long before they expire.
const REFRESH_MARGIN_SECS: i64 = 60;

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl CachedToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        self.expires_at - Duration::seconds(REFRESH_MARGIN_SECS) > now
    }
}

/// Single-slot token cache shared by a model and its bound handles.
///
/// The lock is held while a refresh is in flight, so concurrent callers
/// wait for one token request instead of issuing their own.
#[derive(Debug, Default)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached token, fetching a new one when it is missing or
    /// about to expire.
    pub async fn get_or_refresh<F, Fut>(&self, now: DateTime<Utc>, fetch: F) -> Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<TokenResponse>>,
    {
        let mut slot = self.slot.lock().await;
        if let Some(token) = slot.as_ref()
            && token.is_fresh(now)
        {
            return Ok(token.value.clone());
        }

        let response = fetch().await?;
        debug!(expires_in = response.expires_in, "Fetched access token");
        let expires_at = Duration::try_seconds(response.expires_in)
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .ok_or_else(|| {
                AiCoreError::UnexpectedResponse(format!(
                    "token lifetime of {}s is out of range",
                    response.expires_in
                ))
            })?;
        let token = CachedToken {
            value: response.access_token,
            expires_at,
        };
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    /// Drop the cached token, e.g. after the endpoint rejected it.
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn token(value: &str, expires_in: i64) -> TokenResponse {
        TokenResponse {
            access_token: value.to_string(),
            expires_in,
        }
    }

    #[tokio::test]
    async fn test_token_is_reused_while_fresh() {
        let cache = TokenCache::new();
        let fetches = AtomicUsize::new(0);
        let now = Utc::now();

        for _ in 0..3 {
            let value = cache
                .get_or_refresh(now, || async {
                    fetches.fetch_add(1, Ordering::SeqCst);
                    Ok(token("t1", 3600))
                })
                .await
                .unwrap();
            assert_eq!(value, "t1");
        }
        assert_eq!(fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_token_refreshed_inside_margin() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache
            .get_or_refresh(now, || async { Ok(token("old", 3600)) })
            .await
            .unwrap();

        let later = now + Duration::seconds(3600 - REFRESH_MARGIN_SECS + 1);
        let value = cache
            .get_or_refresh(later, || async { Ok(token("new", 3600)) })
            .await
            .unwrap();
        assert_eq!(value, "new");
    }

    #[tokio::test]
    async fn test_failed_fetch_leaves_cache_empty() {
        let cache = TokenCache::new();
        let now = Utc::now();
        let err = cache
            .get_or_refresh(now, || async {
                Err(AiCoreError::TokenRejected {
                    status: 401,
                    body: "invalid_client".to_string(),
                })
            })
            .await;
        assert!(err.is_err());

        let value = cache
            .get_or_refresh(now, || async { Ok(token("t2", 60 + REFRESH_MARGIN_SECS)) })
            .await
            .unwrap();
        assert_eq!(value, "t2");
    }

    #[tokio::test]
    async fn test_invalidate_forces_refetch() {
        let cache = TokenCache::new();
        let now = Utc::now();
        cache
            .get_or_refresh(now, || async { Ok(token("a", 3600)) })
            .await
            .unwrap();
        cache.invalidate().await;
        let value = cache
            .get_or_refresh(now, || async { Ok(token("b", 3600)) })
            .await
            .unwrap();
        assert_eq!(value, "b");
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_an_error() {
        let cache = TokenCache::new();
        let now = Utc::now();
        let err = cache
            .get_or_refresh(now, || async { Ok(token("huge", i64::MAX)) })
            .await
            .unwrap_err();
        assert!(matches!(err, AiCoreError::UnexpectedResponse(_)));

        // Nothing was cached
        let value = cache
            .get_or_refresh(now, || async { Ok(token("sane", 3600)) })
            .await
            .unwrap();
        assert_eq!(value, "sane");
    }
}
