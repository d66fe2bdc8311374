//! Ошибки ядра.
//!
//! Классификатор тотален и ошибок не возвращает; ошибки возникают только
//! при загрузке каталога и на этапе подбора/показа басни.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Не удалось прочитать каталог {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Некорректный JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Пустой ввод: нечего классифицировать")]
    EmptyInput,

    #[error("Нет басен для эмоции '{key}'")]
    NoFables { key: String },
}

pub type Result<T> = std::result::Result<T, Error>;
