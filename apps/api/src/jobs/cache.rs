//! Redis cache for provider search pages. Best-effort on both sides: a cache
//! failure never fails the request, it just costs a provider round-trip.

use redis::AsyncCommands;
use tracing::debug;

use crate::jobs::provider::JobQuery;
use crate::models::job::JobListing;

/// Listings go stale quickly upstream; 15 minutes keeps pages fresh without
/// hammering the provider.
const CACHE_TTL_SECS: u64 = 900;

pub fn cache_key(query: &JobQuery) -> String {
    let location = query
        .location
        .as_deref()
        .unwrap_or("any")
        .trim()
        .to_lowercase();
    format!(
        "jobs:{}:{}",
        query.query.trim().to_lowercase().replace(' ', "+"),
        location.replace(' ', "+")
    )
}

pub async fn get_cached(redis: &redis::Client, key: &str) -> Option<Vec<JobListing>> {
    let mut conn = match redis.get_multiplexed_async_connection().await {
        Ok(conn) => conn,
        Err(e) => {
            debug!("Redis unavailable for jobs cache read: {e}");
            return None;
        }
    };

    let cached: Option<String> = conn.get(key).await.ok().flatten();
    cached.and_then(|json| serde_json::from_str(&json).ok())
}

pub async fn put_cached(redis: &redis::Client, key: &str, listings: &[JobListing]) {
    let Ok(json) = serde_json::to_string(listings) else {
        return;
    };

    match redis.get_multiplexed_async_connection().await {
        Ok(mut conn) => {
            if let Err(e) = conn.set_ex::<_, _, ()>(key, json, CACHE_TTL_SECS).await {
                debug!("Redis jobs cache write failed: {e}");
            }
        }
        Err(e) => debug!("Redis unavailable for jobs cache write: {e}"),
    }
}
