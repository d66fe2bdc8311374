//! Фабулы эмоций — ядро
//!
//! Предоставляет:
//! - normalize / tokenize: нормализация текста (регистр, диакритики, кавычки, пробелы)
//! - EmotionClassifier: синонимы + приоритеты, Aho-Corasick для фраз
//! - fallback_classify: резервная эвристика по ключевым словам
//! - Catalog: таблица эмоций/басен/активностей из JSON с резервным набором
//! - FableService: классификация → подбор басни → ResponseSink
//! - ClassificationStats: счётчики классификаций
//! - PyO3 модуль (feature "python")

pub mod catalog;
pub mod classifier;
pub mod config;
pub mod error;
pub mod fallback;
pub mod normalizer;
pub mod render;
pub mod selection;
pub mod service;
pub mod stats;

#[cfg(feature = "python")]
mod python;

pub use catalog::{Catalog, Category, EmotionEntry, Fable};
pub use classifier::{classify, ClassificationResult, EmotionClassifier, Match, MatchSource, PriorityOrder};
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use fallback::fallback_classify;
pub use normalizer::{normalize, tokenize};
pub use render::{escape_html, HtmlRenderer, MessageLevel, ResponseSink};
pub use selection::Response;
pub use service::FableService;
pub use stats::{ClassificationStats, StatsSnapshot};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn fabula_core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::FableCore>()?;
    m.add_function(wrap_pyfunction!(python::normalize, m)?)?;
    Ok(())
}
