//! Конфигурация сервиса. Все поля необязательны.

use crate::classifier::PriorityOrder;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    pub catalog_path: PathBuf,
    pub priority: PriorityOrder,
    /// Фиксированное зерно для воспроизводимого выбора басен
    pub seed: Option<u64>,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            catalog_path: PathBuf::from("data/fabulas.json"),
            priority: PriorityOrder::default(),
            seed: None,
        }
    }
}

impl ServiceConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
