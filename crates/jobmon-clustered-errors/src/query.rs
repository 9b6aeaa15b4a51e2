/*
[INPUT]:  Workflow/template inputs, sample cursor positions, fetched error groups
[OUTPUT]: Query keys, per-query fetch state, TTL cache for clustered errors
[POS]:    Panel core - request identity and memoization
[UPDATE]: When changing what identifies a request or how results are cached
*/

use std::time::Duration;

use jobmon_adapter::ErrorGroup;
use moka::sync::Cache;

/// Identity of a clustered-errors request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupQueryKey {
    pub workflow_id: u64,
    pub task_template_id: u64,
}

/// Identity of an error-detail request.
///
/// `selection_epoch` changes on every row activation, so two visits to the
/// same index of the same group are still different requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DetailQueryKey {
    pub workflow_id: u64,
    pub task_template_id: u64,
    pub selection_epoch: u64,
    pub sample_index: usize,
    pub task_instance_id: u64,
}

/// Lifecycle of one query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState<T> {
    /// Preconditions unmet; nothing was requested
    Disabled,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Default for FetchState<T> {
    fn default() -> Self {
        FetchState::Disabled
    }
}

impl<T> FetchState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, FetchState::Loading)
    }

    pub fn data(&self) -> Option<&T> {
        match self {
            FetchState::Ready(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            FetchState::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }
}

/// Upper bound on cached (workflow, template) pairs
const GROUP_CACHE_CAPACITY: u64 = 256;

/// Clustered-error results keyed by (workflow, template), valid for `ttl`.
/// A zero TTL disables caching.
pub struct GroupCache {
    inner: Option<Cache<GroupQueryKey, Vec<ErrorGroup>>>,
}

impl GroupCache {
    pub fn new(ttl: Duration) -> Self {
        let inner = (!ttl.is_zero()).then(|| {
            Cache::builder()
                .max_capacity(GROUP_CACHE_CAPACITY)
                .time_to_live(ttl)
                .build()
        });
        Self { inner }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// Fresh entry for `key`, if any
    pub fn get(&self, key: &GroupQueryKey) -> Option<Vec<ErrorGroup>> {
        self.inner.as_ref()?.get(key)
    }

    pub fn insert(&self, key: GroupQueryKey, groups: Vec<ErrorGroup>) {
        if let Some(cache) = &self.inner {
            cache.insert(key, groups);
        }
    }

    pub fn invalidate(&self, key: &GroupQueryKey) {
        if let Some(cache) = &self.inner {
            cache.invalidate(key);
        }
    }
}

/// Parse a task-template input; empty, zero, or non-numeric means "not selected".
pub fn parse_task_template(input: &str) -> Option<u64> {
    parse_positive_id(input)
}

/// Parse a workflow id input under the same rules as task templates.
pub fn parse_workflow_id(input: &str) -> Option<u64> {
    parse_positive_id(input)
}

fn parse_positive_id(input: &str) -> Option<u64> {
    input.trim().parse::<u64>().ok().filter(|id| *id != 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(task_template_id: u64) -> GroupQueryKey {
        GroupQueryKey {
            workflow_id: 1,
            task_template_id,
        }
    }

    fn group(sample_error: &str) -> ErrorGroup {
        ErrorGroup {
            sample_error: sample_error.to_string(),
            first_error_time: "2024-01-01T00:00:00".to_string(),
            group_instance_count: 1,
            task_instance_ids: vec![1],
        }
    }

    #[test]
    fn test_cache_hit_within_ttl() {
        let cache = GroupCache::new(Duration::from_secs(60));
        cache.insert(key(2), vec![group("OOM")]);

        assert_eq!(cache.get(&key(2)).map(|groups| groups.len()), Some(1));
        assert!(cache.get(&key(3)).is_none());
    }

    #[test]
    fn test_cache_expires_after_ttl() {
        let cache = GroupCache::new(Duration::from_millis(50));
        cache.insert(key(2), vec![group("OOM")]);
        assert!(cache.get(&key(2)).is_some());

        std::thread::sleep(Duration::from_millis(150));
        assert!(cache.get(&key(2)).is_none());
    }

    #[test]
    fn test_zero_ttl_disables_cache() {
        let cache = GroupCache::new(Duration::ZERO);
        assert!(!cache.is_enabled());
        cache.insert(key(2), vec![group("OOM")]);
        assert!(cache.get(&key(2)).is_none());
    }

    #[test]
    fn test_invalidate_removes_entry() {
        let cache = GroupCache::new(Duration::from_secs(60));
        cache.insert(key(2), vec![group("OOM")]);
        cache.insert(key(3), vec![group("Killed")]);
        cache.invalidate(&key(2));
        assert!(cache.get(&key(2)).is_none());
        assert!(cache.get(&key(3)).is_some());
    }

    #[test]
    fn test_parse_task_template_truthiness() {
        assert_eq!(parse_task_template("42"), Some(42));
        assert_eq!(parse_task_template(" 7 "), Some(7));
        assert_eq!(parse_task_template(""), None);
        assert_eq!(parse_task_template("0"), None);
        assert_eq!(parse_task_template("abc"), None);
        assert_eq!(parse_workflow_id("12"), Some(12));
        assert_eq!(parse_workflow_id("-3"), None);
    }

    #[test]
    fn test_fetch_state_accessors() {
        let ready: FetchState<u8> = FetchState::Ready(3);
        assert_eq!(ready.data(), Some(&3));
        assert!(!ready.is_loading());

        let failed: FetchState<u8> = FetchState::Failed("boom".to_string());
        assert_eq!(failed.error(), Some("boom"));
        assert_eq!(failed.data(), None);
    }
}
