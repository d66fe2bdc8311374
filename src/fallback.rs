//! Резервная эвристика настроения
//!
//! Шесть фиксированных корзин ключевых слов, проверяются строго по порядку,
//! первая совпавшая побеждает. Сопоставление — по целым словам.
//! Ничего не совпало → нейтральный кортеж (confundido, "reflexivo").

use crate::catalog::Category;
use crate::classifier::ClassificationResult;
use crate::normalizer::tokenize;

struct Bucket {
    words: &'static [&'static str],
    key: &'static str,
    name: &'static str,
    category: Category,
}

const BUCKETS: &[Bucket] = &[
    Bucket {
        words: &["nervios", "estres", "panico", "angustia", "agobio", "presion"],
        key: "ansioso",
        name: "ansioso",
        category: Category::Negative,
    },
    Bucket {
        words: &["rabia", "ira", "furia", "odio", "indignacion"],
        key: "enojado",
        name: "enojado",
        category: Category::Negative,
    },
    Bucket {
        words: &["abandono", "vacio", "aislamiento", "incomprendido"],
        key: "solo",
        name: "solo",
        category: Category::Negative,
    },
    Bucket {
        words: &["perdido", "confuso", "dudas", "incertidumbre", "dilema"],
        key: "confundido",
        name: "confundido",
        category: Category::Neutral,
    },
    Bucket {
        words: &["horrible", "terrible", "pesimo", "fatal", "destrozado", "devastado", "miserable"],
        key: "mal",
        name: "muy mal",
        category: Category::Negative,
    },
    Bucket {
        words: &["genial", "increible", "maravilloso", "perfecto", "excelente", "radiante", "pleno", "dichoso"],
        key: "bien",
        name: "fantastico",
        category: Category::Positive,
    },
];

pub const DEFAULT_KEY: &str = "confundido";
pub const DEFAULT_NAME: &str = "reflexivo";

/// Результат для неклассифицируемого ввода.
pub fn default_result() -> ClassificationResult {
    ClassificationResult::new(DEFAULT_KEY, DEFAULT_NAME, Category::Neutral)
}

/// Классификация по ключевым словам, когда ни один синоним не совпал.
pub fn fallback_classify(normalized_text: &str) -> ClassificationResult {
    bucket_match(&tokenize(normalized_text)).unwrap_or_else(default_result)
}

/// Первая корзина, слово которой есть среди токенов.
pub(crate) fn bucket_match(tokens: &[&str]) -> Option<ClassificationResult> {
    let bucket = BUCKETS
        .iter()
        .find(|b| b.words.iter().any(|w| tokens.contains(w)))?;
    log::debug!("Резервная корзина '{}' сработала", bucket.key);
    Some(ClassificationResult::new(bucket.key, bucket.name, bucket.category))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anxiety_first() {
        let r = fallback_classify("tengo mucha ansiedad y estres");
        assert_eq!(r.emotion_key, "ansioso");
        assert_eq!(r.category, Category::Negative);
    }

    #[test]
    fn test_bucket_order() {
        // ira (корзина 2) проверяется раньше "genial" (корзина 6)
        let r = fallback_classify("genial pero con ira");
        assert_eq!(r.emotion_key, "enojado");

        let r = fallback_classify("un vacio y muchas dudas");
        assert_eq!(r.emotion_key, "solo");

        let r = fallback_classify("dilema terrible");
        assert_eq!(r.emotion_key, "confundido");
        assert_eq!(r.category, Category::Neutral);
    }

    #[test]
    fn test_generic_buckets() {
        let r = fallback_classify("un dia horrible");
        assert_eq!((r.emotion_key.as_str(), r.display_name.as_str()), ("mal", "muy mal"));

        let r = fallback_classify("todo es maravilloso");
        assert_eq!((r.emotion_key.as_str(), r.display_name.as_str()), ("bien", "fantastico"));
        assert_eq!(r.category, Category::Positive);
    }

    #[test]
    fn test_whole_words_only() {
        // "iracundo" содержит "ira", "fatalidad" — "fatal"
        let r = fallback_classify("iracundo por la fatalidad");
        assert_eq!(r, default_result());
    }

    #[test]
    fn test_default() {
        let r = fallback_classify("xyz123 qwerty");
        assert_eq!(r.emotion_key, "confundido");
        assert_eq!(r.display_name, "reflexivo");
        assert_eq!(r.category, Category::Neutral);
        assert_eq!(fallback_classify(""), default_result());
    }
}
