use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::{debug, info};

/// Tokens are treated as expired this long before the provider says so
pub const EXPIRY_MARGIN: Duration = Duration::from_secs(300);

/// Lifetime assumed when the token response omits `expires_in`
pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(1799);

/// A freshly issued bearer token
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub access_token: String,
    pub expires_in: Option<Duration>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    access_token: String,
    refresh_at: Instant,
}

/// Lazily refreshed access token shared by concurrent callers.
///
/// The expiry check, refresh and store all happen under one lock, so
/// callers racing on an expired token trigger a single refresh.
#[derive(Debug)]
pub struct TokenCache {
    slot: Mutex<Option<CachedToken>>,
    margin: Duration,
}

impl Default for TokenCache {
    fn default() -> Self {
        Self::new(EXPIRY_MARGIN)
    }
}

impl TokenCache {
    #[must_use]
    pub fn new(margin: Duration) -> Self {
        Self {
            slot: Mutex::new(None),
            margin,
        }
    }

    /// Return the cached token, calling `refresh` first if it is missing or stale
    pub async fn get_or_refresh<F, Fut>(&self, refresh: F) -> crate::Result<String>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = crate::Result<IssuedToken>>,
    {
        let mut slot = self.slot.lock().await;

        if let Some(cached) = slot.as_ref()
            && Instant::now() < cached.refresh_at
        {
            debug!("Using cached access token");
            return Ok(cached.access_token.clone());
        }

        info!("Requesting new access token");
        let issued = refresh().await?;
        let lifetime = issued.expires_in.unwrap_or(DEFAULT_LIFETIME);
        let refresh_at = Instant::now() + lifetime.saturating_sub(self.margin);

        *slot = Some(CachedToken {
            access_token: issued.access_token.clone(),
            refresh_at,
        });
        Ok(issued.access_token)
    }

    /// Drop the cached token so the next call refreshes
    pub async fn invalidate(&self) {
        *self.slot.lock().await = None;
    }
}
