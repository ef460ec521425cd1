//! Physical memory query.
//!
//! A stateless helper for callers that size the cache relative to the
//! machine. Shares nothing with any cache instance.

use sysinfo::System;

/// Returns the machine's total physical memory in bytes.
///
/// Queries the OS on every call; callers sizing a cache typically call it
/// once at startup.
///
/// # Examples
///
/// ```
/// let ram = smartcache::query_system_memory();
/// assert!(ram > 0);
/// ```
pub fn query_system_memory() -> u64 {
    let mut sys = System::new();
    sys.refresh_memory();
    sys.total_memory()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reports_nonzero_memory() {
        assert!(query_system_memory() > 0);
    }

    #[test]
    fn test_stable_across_calls() {
        // Total physical memory does not change between two calls
        assert_eq!(query_system_memory(), query_system_memory());
    }
}
