use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::convert::{convert, Side};
use crate::storage::KeyValueStore;

pub const HISTORY_LIMIT: usize = 10;
pub const STORAGE_KEY: &str = "reso-history";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryRecord {
    pub id: String,
    pub input_side: Side,
    pub input_value: f64,
    pub result_value: f64,
    pub timestamp: u64,
}

impl HistoryRecord {
    /// Values as (left, right) regardless of which side drove the conversion.
    pub fn pair(&self) -> (f64, f64) {
        match self.input_side {
            Side::Left => (self.input_value, self.result_value),
            Side::Right => (self.result_value, self.input_value),
        }
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Ordered, deduplicated, size-bounded log of conversions, newest first.
/// Every change is written back to the key/value store as one JSON array.
pub struct HistoryStore<S> {
    records: Vec<HistoryRecord>,
    store: S,
    limit: usize,
    last_id: u64,
}

impl<S: KeyValueStore> HistoryStore<S> {
    /// Read prior state. Missing or malformed data yields an empty history.
    pub fn load(store: S) -> Self {
        Self::load_with_limit(store, HISTORY_LIMIT)
    }

    pub fn load_with_limit(store: S, limit: usize) -> Self {
        let mut records = match store.get(STORAGE_KEY) {
            Ok(Some(raw)) => match serde_json::from_str::<Vec<HistoryRecord>>(&raw) {
                Ok(v) => v,
                Err(e) => {
                    warn!(target: "reso", "discarding unparsable history: {}", e);
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                warn!(target: "reso", "history read failed: {}", e);
                Vec::new()
            }
        };
        records.truncate(limit);
        for r in &mut records {
            let expected = convert(r.input_side, r.input_value);
            if r.result_value != expected {
                debug!(target: "reso", id = %r.id, stored = r.result_value, expected, "recomputing stored result");
                r.result_value = expected;
            }
        }
        // ids from the future can only come from damaged data; ignore them so
        // new ids keep tracking the clock
        let now = now_millis();
        let last_id = records
            .iter()
            .filter_map(|r| r.id.parse::<u64>().ok())
            .filter(|&id| id <= now)
            .max()
            .unwrap_or(0);
        info!(target: "reso", "history loaded: {} records", records.len());
        Self {
            records,
            store,
            limit,
            last_id,
        }
    }

    pub fn records(&self) -> &[HistoryRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&HistoryRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Prepend a record unless the newest one has the same side and input.
    /// The result is always derived from the input. Returns true when a
    /// record was added.
    pub fn commit(&mut self, side: Side, input_value: f64) -> bool {
        if let Some(top) = self.records.first() {
            if top.input_side == side && top.input_value == input_value {
                debug!(target: "reso", side = side.label(), input_value, "history dedup");
                return false;
            }
        }
        let result_value = convert(side, input_value);
        let timestamp = now_millis();
        let id = timestamp.max(self.last_id.saturating_add(1));
        self.last_id = id;
        self.records.insert(
            0,
            HistoryRecord {
                id: id.to_string(),
                input_side: side,
                input_value,
                result_value,
                timestamp,
            },
        );
        self.records.truncate(self.limit);
        self.persist();
        true
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.persist();
        info!(target: "reso", "history cleared");
    }

    fn persist(&self) {
        let data = match serde_json::to_string(&self.records) {
            Ok(d) => d,
            Err(e) => {
                warn!(target: "reso", "history encode failed: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(STORAGE_KEY, &data) {
            warn!(target: "reso", "history persist failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::storage::{MemoryStore, StorageError};

    fn stored(store: &MemoryStore) -> Vec<HistoryRecord> {
        let raw = store.get(STORAGE_KEY).unwrap().unwrap();
        serde_json::from_str(&raw).unwrap()
    }

    #[test]
    fn commit_prepends_and_persists() {
        let mem = Arc::new(MemoryStore::new());
        let mut h = HistoryStore::load(mem.clone());
        assert!(h.commit(Side::Left, 1920.0));
        assert!(h.commit(Side::Right, 10.0));
        assert_eq!(h.len(), 2);
        assert_eq!(h.records()[0].input_side, Side::Right);
        assert_eq!(stored(&mem), h.records());
    }

    #[test]
    fn consecutive_duplicate_is_skipped() {
        let mut h = HistoryStore::load(MemoryStore::new());
        assert!(h.commit(Side::Left, 100.0));
        assert!(!h.commit(Side::Left, 100.0));
        assert_eq!(h.len(), 1);
        // same value from the other side is a different record
        assert!(h.commit(Side::Right, 100.0));
        // only the newest is compared
        assert!(h.commit(Side::Left, 100.0));
        assert_eq!(h.len(), 3);
    }

    #[test]
    fn bounded_to_limit_newest_first() {
        let mut h = HistoryStore::load(MemoryStore::new());
        for i in 1..=15 {
            let v = i as f64;
            h.commit(Side::Left, v);
        }
        assert_eq!(h.len(), HISTORY_LIMIT);
        let inputs: Vec<f64> = h.records().iter().map(|r| r.input_value).collect();
        let expected: Vec<f64> = (6..=15).rev().map(|i| i as f64).collect();
        assert_eq!(inputs, expected);
    }

    #[test]
    fn ids_are_strictly_increasing() {
        let mut h = HistoryStore::load(MemoryStore::new());
        for i in 1..=5 {
            let v = i as f64;
            h.commit(Side::Left, v);
        }
        let ids: Vec<u64> = h.records().iter().map(|r| r.id.parse().unwrap()).collect();
        assert!(ids.windows(2).all(|w| w[0] > w[1]), "{ids:?}");
    }

    #[test]
    fn clear_empties_storage() {
        let mem = Arc::new(MemoryStore::new());
        let mut h = HistoryStore::load(mem.clone());
        h.commit(Side::Left, 5.0);
        h.clear();
        assert!(h.is_empty());
        assert_eq!(mem.get(STORAGE_KEY).unwrap().as_deref(), Some("[]"));
    }

    #[test]
    fn corrupted_storage_loads_empty() {
        let h = HistoryStore::load(MemoryStore::with_entry(STORAGE_KEY, "not-json"));
        assert!(h.is_empty());
    }

    #[test]
    fn loads_wire_format_and_repairs_results() {
        let raw = r#"[
            {"id":"1700000000001","inputSide":"right","inputValue":1200,"resultValue":1920,"timestamp":1700000000001},
            {"id":"1700000000000","inputSide":"left","inputValue":1920,"resultValue":5,"timestamp":1700000000000}
        ]"#;
        let mut h = HistoryStore::load(MemoryStore::with_entry(STORAGE_KEY, raw));
        assert_eq!(h.len(), 2);
        assert_eq!(h.records()[0].pair(), (1920.0, 1200.0));
        assert_eq!(h.records()[1].result_value, 1200.0);
        h.commit(Side::Left, 1.0);
        assert!(h.records()[0].id.parse::<u64>().unwrap() > 1_700_000_000_001);
    }

    #[test]
    fn commit_derives_result() {
        let mut h = HistoryStore::load(MemoryStore::new());
        h.commit(Side::Right, 1200.0);
        h.commit(Side::Left, 4.0);
        assert_eq!(h.records()[1].result_value, 1920.0);
        assert_eq!(h.records()[0].result_value, 3.0);
    }

    #[test]
    fn oversized_stored_id_does_not_break_new_ids() {
        let raw = format!(
            r#"[{{"id":"{}","inputSide":"left","inputValue":8,"resultValue":5,"timestamp":0}}]"#,
            u64::MAX
        );
        let mut h = HistoryStore::load(MemoryStore::with_entry(STORAGE_KEY, &raw));
        assert_eq!(h.len(), 1);
        assert!(h.commit(Side::Left, 16.0));
        assert!(h.commit(Side::Left, 32.0));
        let newest: u64 = h.records()[0].id.parse().unwrap();
        let prev: u64 = h.records()[1].id.parse().unwrap();
        assert!(newest > prev && prev < u64::MAX);
        assert_eq!(h.records()[2].id, u64::MAX.to_string());
    }

    #[test]
    fn serializes_camel_case() {
        let r = HistoryRecord {
            id: "1".into(),
            input_side: Side::Left,
            input_value: 1920.0,
            result_value: 1200.0,
            timestamp: 1,
        };
        let v: serde_json::Value = serde_json::to_value(&r).unwrap();
        assert_eq!(v["inputSide"], "left");
        assert_eq!(v["resultValue"], 1200.0);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Unavailable("read-only medium".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Unavailable("read-only medium".into()))
        }
    }

    #[test]
    fn storage_failures_are_not_fatal() {
        let mut h = HistoryStore::load(BrokenStore);
        assert!(h.is_empty());
        assert!(h.commit(Side::Left, 8.0));
        assert_eq!(h.len(), 1);
        h.clear();
        assert!(h.is_empty());
    }
}
