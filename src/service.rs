//! FableService — связка классификатора, каталога и показа
//!
//! analyze(): ввод → normalize → classify → подбор басни → sink.render()
//! show_for_key(): быстрые кнопки (bien / mal), без классификации

use crate::catalog::Catalog;
use crate::classifier::{ClassificationResult, EmotionClassifier, MatchSource, PriorityOrder};
use crate::config::ServiceConfig;
use crate::error::{Error, Result};
use crate::normalizer::normalize;
use crate::render::{MessageLevel, ResponseSink};
use crate::selection::{build_response, Response};
use crate::stats::{ClassificationStats, StatsSnapshot};
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;

const EMPTY_INPUT_MESSAGE: &str = "Por favor, escribe cómo te sientes.";
const NO_FABLES_MESSAGE: &str = "No hay fábulas disponibles en este momento.";

pub struct FableService {
    catalog: Catalog,
    classifier: EmotionClassifier,
    stats: ClassificationStats,
    rng: Mutex<StdRng>,
}

impl FableService {
    pub fn new(catalog: Catalog, priority: PriorityOrder) -> Self {
        Self::with_rng(catalog, priority, StdRng::from_os_rng())
    }

    pub fn with_seed(catalog: Catalog, priority: PriorityOrder, seed: u64) -> Self {
        Self::with_rng(catalog, priority, StdRng::seed_from_u64(seed))
    }

    fn with_rng(catalog: Catalog, priority: PriorityOrder, rng: StdRng) -> Self {
        let classifier = EmotionClassifier::new(&catalog.emotions, priority);
        Self {
            catalog,
            classifier,
            stats: ClassificationStats::new(),
            rng: Mutex::new(rng),
        }
    }

    /// Каталог читается с диска; недоступен — встроенный резервный.
    pub fn from_config(config: &ServiceConfig) -> Self {
        let catalog = Catalog::load_or_fallback(&config.catalog_path);
        match config.seed {
            Some(seed) => Self::with_seed(catalog, config.priority.clone(), seed),
            None => Self::new(catalog, config.priority.clone()),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &EmotionClassifier {
        &self.classifier
    }

    /// Классифицирует сырой ввод и учитывает результат в статистике.
    pub fn classify(&self, raw: &str) -> ClassificationResult {
        let (result, source) = self.classifier.classify_with_source(&normalize(raw));
        self.stats.record(&result, source);
        result
    }

    /// Пакетная классификация; каждый результат учитывается в статистике.
    pub fn classify_batch<T>(&self, texts: &[T]) -> Vec<ClassificationResult>
    where
        T: AsRef<str> + Sync,
    {
        self.classifier
            .classify_batch_with_source(texts)
            .into_iter()
            .map(|(result, source)| {
                self.stats.record(&result, source);
                result
            })
            .collect()
    }

    /// Полный путь: классификация, подбор басни, показ.
    pub fn analyze(&self, raw: &str, sink: &mut dyn ResponseSink) -> Result<ClassificationResult> {
        let original = raw.trim();
        let text = normalize(original);
        if text.is_empty() {
            sink.message(EMPTY_INPUT_MESSAGE, MessageLevel::Warning);
            return Err(Error::EmptyInput);
        }

        let (result, source) = self.classifier.classify_with_source(&text);
        self.stats.record(&result, source);
        if source != MatchSource::Synonym {
            log::debug!("'{}' классифицирован без синонимов: {:?}", text, source);
        }

        self.present(result.clone(), Some(original), sink)?;
        Ok(result)
    }

    /// Быстрые кнопки: показать басню для ключа без анализа текста.
    pub fn show_for_key(&self, key: &str, sink: &mut dyn ResponseSink) -> Result<Response> {
        let category = self.catalog.category_of(key);
        let result = ClassificationResult::new(key, key, category);
        self.present(result, None, sink)
    }

    fn present(
        &self,
        result: ClassificationResult,
        original: Option<&str>,
        sink: &mut dyn ResponseSink,
    ) -> Result<Response> {
        let built = {
            let mut rng = self.rng.lock();
            build_response(&self.catalog, result, original, &mut *rng)
        };
        match built {
            Ok(response) => {
                sink.render(&response);
                Ok(response)
            }
            Err(e) => {
                log::warn!("Не удалось подобрать басню: {}", e);
                sink.message(NO_FABLES_MESSAGE, MessageLevel::Error);
                Err(e)
            }
        }
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.stats.snapshot()
    }

    pub fn reset_stats(&self) {
        self.stats.reset();
    }
}
