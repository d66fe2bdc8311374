//! EmotionClassifier — определение эмоции по синонимам
//!
//! Алгоритм:
//! - каждый синоним нормализуется тем же normalize()
//! - фраза (есть пробел) ищется как подстрока — один проход Aho-Corasick по тексту
//! - одиночное слово ищется среди токенов (вместо regex `\b`: "mal" не совпадает в "maleta")
//! - в пределах одной эмоции побеждает первый совпавший синоним
//! - среди совпавших эмоций побеждает ранняя в PriorityOrder;
//!   ключи вне списка идут после всех перечисленных, в порядке таблицы
//! - ничего не совпало → резервная эвристика (fallback)

use crate::catalog::{Category, EmotionEntry};
use crate::fallback::{bucket_match, default_result};
use crate::normalizer::{contains_tokens, normalize, tokenize};
use aho_corasick::AhoCorasick;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Порядок разрешения конфликтов по умолчанию.
pub const DEFAULT_PRIORITY: &[&str] = &[
    "ansioso", "enojado", "mal", "solo", "confundido", "agradecido", "motivado", "bien",
];

const PARALLEL_THRESHOLD: usize = 32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub emotion_key: String,
    pub display_name: String,
    pub category: Category,
}

impl ClassificationResult {
    pub fn new(emotion_key: &str, display_name: &str, category: Category) -> Self {
        Self {
            emotion_key: emotion_key.to_string(),
            display_name: display_name.to_string(),
            category,
        }
    }
}

/// Совпадение одной записи таблицы с текстом.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub emotion_key: String,
    pub matched_synonym: String,
    pub category: Category,
}

impl From<Match> for ClassificationResult {
    fn from(m: Match) -> Self {
        Self {
            emotion_key: m.emotion_key,
            display_name: m.matched_synonym,
            category: m.category,
        }
    }
}

/// Как был получен результат.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchSource {
    Synonym,
    Fallback,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityOrder(Vec<String>);

impl PriorityOrder {
    pub fn new<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(keys.into_iter().map(Into::into).collect())
    }

    /// Позиция ключа; отсутствующие ключи получают usize::MAX.
    pub fn rank(&self, key: &str) -> usize {
        self.0.iter().position(|k| k == key).unwrap_or(usize::MAX)
    }

    pub fn keys(&self) -> &[String] {
        &self.0
    }
}

impl Default for PriorityOrder {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY.iter().copied())
    }
}

// ── Скомпилированная таблица ──

enum Pattern {
    /// Слово (или слитная запись вроде "auto-estima") — последовательность токенов
    Tokens(Vec<String>),
    /// Индекс фразы в phrases / phrase_ac
    Phrase(usize),
}

struct CompiledSynonym {
    raw: String,
    pattern: Pattern,
}

struct CompiledEntry {
    key: String,
    category: Category,
    synonyms: Vec<CompiledSynonym>,
}

pub struct EmotionClassifier {
    entries: Vec<CompiledEntry>,
    phrases: Vec<String>,
    phrase_ac: Option<AhoCorasick>,
    priority: PriorityOrder,
}

impl EmotionClassifier {
    pub fn new(table: &[EmotionEntry], priority: PriorityOrder) -> Self {
        let mut phrases = Vec::new();
        let mut entries = Vec::with_capacity(table.len());

        for entry in table {
            let mut synonyms = Vec::with_capacity(entry.synonyms.len());
            for raw in &entry.synonyms {
                let norm = normalize(raw);
                if norm.is_empty() {
                    continue;
                }
                let pattern = if norm.contains(' ') {
                    phrases.push(norm);
                    Pattern::Phrase(phrases.len() - 1)
                } else {
                    let tokens: Vec<String> = tokenize(&norm).into_iter().map(str::to_string).collect();
                    if tokens.is_empty() {
                        // чистая пунктуация — словом быть не может
                        continue;
                    }
                    Pattern::Tokens(tokens)
                };
                synonyms.push(CompiledSynonym { raw: raw.clone(), pattern });
            }
            entries.push(CompiledEntry {
                key: entry.key.clone(),
                category: entry.category,
                synonyms,
            });
        }

        let phrase_ac = if phrases.is_empty() {
            None
        } else {
            match AhoCorasick::new(&phrases) {
                Ok(ac) => Some(ac),
                Err(e) => {
                    log::warn!("Aho-Corasick не построен ({}), фразы ищутся через contains", e);
                    None
                }
            }
        };

        log::debug!(
            "EmotionClassifier: {} эмоций, {} фраз",
            entries.len(),
            phrases.len()
        );

        Self { entries, phrases, phrase_ac, priority }
    }

    pub fn priority(&self) -> &PriorityOrder {
        &self.priority
    }

    /// Все совпадения, по одному на эмоцию, в порядке таблицы.
    pub fn matches(&self, normalized_text: &str) -> Vec<Match> {
        let tokens = tokenize(normalized_text);
        self.matches_with_tokens(normalized_text, &tokens)
    }

    fn matches_with_tokens(&self, text: &str, tokens: &[&str]) -> Vec<Match> {
        let phrase_hits = self.phrase_hits(text);

        self.entries
            .iter()
            .filter_map(|entry| {
                let hit = entry.synonyms.iter().find(|syn| match &syn.pattern {
                    Pattern::Phrase(id) => phrase_hits[*id],
                    Pattern::Tokens(needle) => contains_tokens(tokens, needle.as_slice()),
                })?;
                Some(Match {
                    emotion_key: entry.key.clone(),
                    matched_synonym: hit.raw.clone(),
                    category: entry.category,
                })
            })
            .collect()
    }

    fn phrase_hits(&self, text: &str) -> Vec<bool> {
        let mut hits = vec![false; self.phrases.len()];
        match &self.phrase_ac {
            Some(ac) => {
                for m in ac.find_overlapping_iter(text) {
                    hits[m.pattern().as_usize()] = true;
                }
            }
            None => {
                for (hit, phrase) in hits.iter_mut().zip(&self.phrases) {
                    *hit = text.contains(phrase.as_str());
                }
            }
        }
        hits
    }

    /// Классифицирует уже нормализованный текст. Всегда возвращает ровно один результат.
    pub fn classify(&self, normalized_text: &str) -> ClassificationResult {
        self.classify_with_source(normalized_text).0
    }

    pub fn classify_with_source(&self, normalized_text: &str) -> (ClassificationResult, MatchSource) {
        let tokens = tokenize(normalized_text);

        // min_by_key возвращает первый из равных — порядок таблицы сохраняется
        let best = self
            .matches_with_tokens(normalized_text, &tokens)
            .into_iter()
            .min_by_key(|m| self.priority.rank(&m.emotion_key));

        if let Some(m) = best {
            log::debug!("Синоним '{}' → эмоция '{}'", m.matched_synonym, m.emotion_key);
            return (m.into(), MatchSource::Synonym);
        }

        match bucket_match(&tokens) {
            Some(result) => (result, MatchSource::Fallback),
            None => (default_result(), MatchSource::Default),
        }
    }

    /// Нормализует и классифицирует сырой пользовательский ввод.
    pub fn classify_text(&self, raw: &str) -> ClassificationResult {
        self.classify(&normalize(raw))
    }

    /// Пакетная классификация сырых строк. Rayon при >= 32 входах.
    pub fn classify_batch<T>(&self, texts: &[T]) -> Vec<ClassificationResult>
    where
        T: AsRef<str> + Sync,
    {
        self.classify_batch_with_source(texts)
            .into_iter()
            .map(|(result, _)| result)
            .collect()
    }

    pub fn classify_batch_with_source<T>(&self, texts: &[T]) -> Vec<(ClassificationResult, MatchSource)>
    where
        T: AsRef<str> + Sync,
    {
        let one = |t: &T| self.classify_with_source(&normalize(t.as_ref()));
        if texts.len() >= PARALLEL_THRESHOLD {
            texts.par_iter().map(one).collect()
        } else {
            texts.iter().map(one).collect()
        }
    }
}

/// Разовая классификация без предварительной компиляции таблицы.
pub fn classify(normalized_text: &str, table: &[EmotionEntry], priority: &PriorityOrder) -> ClassificationResult {
    EmotionClassifier::new(table, priority.clone()).classify(normalized_text)
}
