use super::*;

#[test]
fn memory_cache_starts_empty() {
    let cache = MemorySessionCache::new();
    assert_eq!(cache.get("msp_admin_mode"), None);
}

#[test]
fn memory_cache_set_then_get() {
    let cache = MemorySessionCache::new();
    cache.set("k", "true");
    assert_eq!(cache.get("k").as_deref(), Some("true"));
}

#[test]
fn memory_cache_clear_removes_only_that_key() {
    let cache = MemorySessionCache::new();
    cache.set("a", "1");
    cache.set("b", "2");
    cache.clear("a");
    assert_eq!(cache.get("a"), None);
    assert_eq!(cache.get("b").as_deref(), Some("2"));
}

#[test]
fn memory_cache_with_entry_is_preseeded() {
    let cache = MemorySessionCache::with_entry("msp_admin_mode", "true");
    assert_eq!(cache.get("msp_admin_mode").as_deref(), Some("true"));
}

#[cfg(not(feature = "hydrate"))]
#[test]
fn browser_cache_outside_browser_reads_absent() {
    let cache = BrowserSessionCache;
    cache.set("msp_admin_mode", "true");
    assert_eq!(cache.get("msp_admin_mode"), None);
}
