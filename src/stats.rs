//! ClassificationStats — счётчики классификаций
//!
//! - DashMap: счётчик на ключ эмоции без глобальной блокировки
//! - AtomicU64: lock-free итоги по источнику (синоним / эвристика / по умолчанию)
//! - время последней классификации под RwLock

use crate::classifier::{ClassificationResult, MatchSource};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parking_lot::RwLock;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Default)]
pub struct ClassificationStats {
    per_emotion: DashMap<String, u64>,
    synonym: AtomicU64,
    fallback: AtomicU64,
    default: AtomicU64,
    last: RwLock<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsSnapshot {
    pub total: u64,
    pub by_synonym: u64,
    pub by_fallback: u64,
    pub by_default: u64,
    pub per_emotion: BTreeMap<String, u64>,
    pub last_classified: Option<DateTime<Utc>>,
}

impl ClassificationStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, result: &ClassificationResult, source: MatchSource) {
        self.per_emotion
            .entry(result.emotion_key.clone())
            .and_modify(|c| *c += 1)
            .or_insert(1);
        let counter = match source {
            MatchSource::Synonym => &self.synonym,
            MatchSource::Fallback => &self.fallback,
            MatchSource::Default => &self.default,
        };
        counter.fetch_add(1, Ordering::Relaxed);
        *self.last.write() = Some(Utc::now());
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        let by_synonym = self.synonym.load(Ordering::Relaxed);
        let by_fallback = self.fallback.load(Ordering::Relaxed);
        let by_default = self.default.load(Ordering::Relaxed);
        StatsSnapshot {
            total: by_synonym + by_fallback + by_default,
            by_synonym,
            by_fallback,
            by_default,
            per_emotion: self
                .per_emotion
                .iter()
                .map(|r| (r.key().clone(), *r.value()))
                .collect(),
            last_classified: *self.last.read(),
        }
    }

    pub fn reset(&self) {
        self.per_emotion.clear();
        self.synonym.store(0, Ordering::Relaxed);
        self.fallback.store(0, Ordering::Relaxed);
        self.default.store(0, Ordering::Relaxed);
        *self.last.write() = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;

    #[test]
    fn test_record_and_snapshot() {
        let stats = ClassificationStats::new();
        let bien = ClassificationResult::new("bien", "feliz", Category::Positive);
        let ansioso = ClassificationResult::new("ansioso", "ansioso", Category::Negative);

        stats.record(&bien, MatchSource::Synonym);
        stats.record(&bien, MatchSource::Synonym);
        stats.record(&ansioso, MatchSource::Fallback);

        let snap = stats.snapshot();
        assert_eq!(snap.total, 3);
        assert_eq!(snap.by_synonym, 2);
        assert_eq!(snap.by_fallback, 1);
        assert_eq!(snap.by_default, 0);
        assert_eq!(snap.per_emotion["bien"], 2);
        assert!(snap.last_classified.is_some());
    }

    #[test]
    fn test_reset() {
        let stats = ClassificationStats::new();
        stats.record(&ClassificationResult::new("x", "x", Category::Neutral), MatchSource::Default);
        stats.reset();
        let snap = stats.snapshot();
        assert_eq!(snap.total, 0);
        assert!(snap.per_emotion.is_empty());
        assert!(snap.last_classified.is_none());
    }

    #[test]
    fn test_snapshot_serializes() {
        let stats = ClassificationStats::new();
        stats.record(&ClassificationResult::new("solo", "solo", Category::Negative), MatchSource::Synonym);
        let json = serde_json::to_value(stats.snapshot()).unwrap();
        assert_eq!(json["per_emotion"]["solo"], 1);
        assert_eq!(json["total"], 1);
    }
}
