//! PyO3 обёртка над FableService (feature "python")

use crate::classifier::{ClassificationResult, PriorityOrder};
use crate::config::ServiceConfig;
use crate::error::Error;
use crate::render::HtmlRenderer;
use crate::service::FableService;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyDict;
use std::path::PathBuf;

impl From<Error> for PyErr {
    fn from(e: Error) -> Self {
        PyValueError::new_err(e.to_string())
    }
}

fn as_tuple(r: ClassificationResult) -> (String, String, String) {
    (r.emotion_key, r.display_name, r.category.as_str().to_string())
}

#[pyclass(frozen)]
pub struct FableCore {
    service: FableService,
}

#[pymethods]
impl FableCore {
    #[new]
    #[pyo3(signature = (catalog_path=None, priority=None, seed=None))]
    fn new(catalog_path: Option<String>, priority: Option<Vec<String>>, seed: Option<u64>) -> Self {
        let mut config = ServiceConfig {
            seed,
            ..Default::default()
        };
        if let Some(path) = catalog_path {
            config.catalog_path = PathBuf::from(path);
        }
        if let Some(keys) = priority {
            config.priority = PriorityOrder::new(keys);
        }
        Self {
            service: FableService::from_config(&config),
        }
    }

    /// (ключ, отображаемое имя, категория)
    fn classify(&self, text: &str) -> (String, String, String) {
        as_tuple(self.service.classify(text))
    }

    fn classify_batch(&self, py: Python<'_>, texts: Vec<String>) -> Vec<(String, String, String)> {
        py.allow_threads(|| {
            self.service
                .classify_batch(texts.as_slice())
                .into_iter()
                .map(as_tuple)
                .collect()
        })
    }

    fn respond_html(&self, text: &str) -> PyResult<String> {
        let mut sink = HtmlRenderer::new();
        self.service.analyze(text, &mut sink)?;
        Ok(sink.into_html())
    }

    fn show_html(&self, key: &str) -> PyResult<String> {
        let mut sink = HtmlRenderer::new();
        self.service.show_for_key(key, &mut sink)?;
        Ok(sink.into_html())
    }

    /// {"total", "by_synonym", "by_fallback", "by_default", "per_emotion": {key: n}}
    fn get_stats<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let snap = self.service.stats();
        let dict = PyDict::new(py);
        dict.set_item("total", snap.total)?;
        dict.set_item("by_synonym", snap.by_synonym)?;
        dict.set_item("by_fallback", snap.by_fallback)?;
        dict.set_item("by_default", snap.by_default)?;
        dict.set_item("per_emotion", snap.per_emotion)?;
        Ok(dict)
    }

    fn reset_stats(&self) {
        self.service.reset_stats();
    }
}

#[pyfunction]
pub fn normalize(text: &str) -> String {
    crate::normalizer::normalize(text)
}
