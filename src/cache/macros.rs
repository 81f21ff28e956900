/// A macro to simplify memoization through a [`MemoCache`](crate::cache::MemoCache).
///
/// This macro checks if a value is present in the cache.
/// If found, it returns a clone of the cached value.
/// If not found, it awaits the provided block to compute the value,
/// stores it in the cache, and then returns the computed value.
/// Errors from the block are propagated with `?` and never stored.
///
/// # Arguments
/// * `$cache`: The cache instance, with async `get` and `insert` methods.
/// * `$key`: The key to use for caching the value.
/// * `$block`: The future to await if the value is not found in cache.
///
/// # Example
/// ```rust,ignore
/// let ids = cached!(self.cache, CacheKey::Recommendations(kind, title.to_string()), async {
///     self.compute(kind, title)
/// });
/// ```
#[macro_export]
macro_rules! cached {
    ($cache:expr, $key:expr, $block:expr) => {{
        let key = $key;
        if let Some(cached) = $cache.get(&key).await {
            Ok(cached)
        } else {
            let value = $block.await?;
            $cache.insert(key, ::std::clone::Clone::clone(&value)).await;
            Ok(value)
        }
    }};
}
