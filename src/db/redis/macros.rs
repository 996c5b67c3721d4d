/// Read-through caching over [`Cache`](super::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// queues the result for a background write with `$ttl` seconds to live, and returns it.
/// Evaluates to an `AppResult`. A failed cache read is logged and treated as a miss;
/// errors from `$block` propagate with `?`.
///
/// # Example
/// ```rust,ignore
/// let distribution = cached!(cache, CacheKey::TravelSeasons, 30, async {
///     compute_distribution().await
/// })?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        let hit = match $cache.get_from_cache(&$key).await {
            Ok(hit) => hit,
            Err(e) => {
                tracing::warn!(key = %$key, error = %e, "Cache read failed, computing instead");
                None
            }
        };
        if let Some(cached) = hit {
            tracing::debug!(key = %$key, "Cache hit");
            Ok(cached)
        } else {
            tracing::debug!(key = %$key, "Cache miss");
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
