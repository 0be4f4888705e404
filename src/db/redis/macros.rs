/// Read-through caching over a [`Cache`](crate::db::Cache).
///
/// Returns the cached value for `$key` when present. Otherwise awaits `$block`,
/// queues the result for caching with `$ttl` seconds and returns it. Errors from
/// the cache read or the block are propagated with `?`.
///
/// ```rust,ignore
/// let place: Option<Place> = cached!(cache, CacheKey::Place(id), ttl, store.get_place(id))?;
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $ttl:expr, $block:expr) => {{
        if let Some(cached) = $cache.get_from_cache(&$key).await? {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.set_in_background(&$key, &value, $ttl);
            Ok(value)
        }
    }};
}
