//! Catalog — таблица эмоций, басен и активностей
//!
//! Формат JSON (поля на испанском, как в файле данных виджета):
//! - emociones: key → { sinonimos: [...], tipo: "positiva" | "negativa" | "neutra" }
//! - fabulas: key → [{ titulo, contenido, moraleja, autor }]
//! - actividades: tipo → [строки]
//!
//! Любой раздел или поле может отсутствовать — подставляются значения по умолчанию.
//! Порядок эмоций сохраняется как в документе.

use crate::error::{Error, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Грубая категория эмоции. Неизвестная или отсутствующая → Neutral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "positiva")]
    Positive,
    #[serde(rename = "negativa")]
    Negative,
    #[default]
    #[serde(rename = "neutra")]
    Neutral,
}

impl Category {
    /// Принимает испанские и английские метки; всё прочее → Neutral.
    pub fn from_label(label: &str) -> Self {
        Self::parse_label(label).unwrap_or_default()
    }

    /// Только распознанные метки; прочее → None.
    pub fn parse_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "positiva" | "positivo" | "positive" => Some(Category::Positive),
            "negativa" | "negativo" | "negative" => Some(Category::Negative),
            "neutra" | "neutro" | "neutral" => Some(Category::Neutral),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Positive => "positiva",
            Category::Negative => "negativa",
            Category::Neutral => "neutra",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmotionEntry {
    pub key: String,
    pub synonyms: Vec<String>,
    pub category: Category,
}

impl EmotionEntry {
    pub fn new(key: &str, synonyms: &[&str], category: Category) -> Self {
        Self {
            key: key.to_string(),
            synonyms: synonyms.iter().map(|s| s.to_string()).collect(),
            category,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Fable {
    #[serde(rename = "titulo", default)]
    pub title: Option<String>,
    #[serde(rename = "contenido", default)]
    pub content: Option<String>,
    #[serde(rename = "moraleja", default)]
    pub moral: Option<String>,
    #[serde(rename = "autor", default)]
    pub author: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub emotions: Vec<EmotionEntry>,
    pub fables: HashMap<String, Vec<Fable>>,
    pub activities: HashMap<Category, Vec<String>>,
}

// ── Сырой формат документа ──

#[derive(Deserialize, Default)]
struct RawEmotion {
    #[serde(rename = "sinonimos", default)]
    synonyms: Option<Vec<String>>,
    #[serde(rename = "tipo", default)]
    kind: Option<String>,
}

#[derive(Deserialize, Default)]
struct RawCatalog {
    #[serde(rename = "emociones", default, deserialize_with = "ordered_emotions")]
    emotions: Vec<(String, RawEmotion)>,
    #[serde(rename = "fabulas", default)]
    fables: Option<HashMap<String, Option<Vec<Fable>>>>,
    #[serde(rename = "actividades", default)]
    activities: Option<HashMap<String, Option<Vec<String>>>>,
}

/// Читает объект `emociones` в порядке документа (HashMap порядок теряет).
fn ordered_emotions<'de, D>(deserializer: D) -> std::result::Result<Vec<(String, RawEmotion)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<(String, RawEmotion)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("объект эмоций")
        }

        fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
        where
            E: serde::de::Error,
        {
            Ok(Vec::new())
        }

        fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
        where
            A: MapAccess<'de>,
        {
            let mut out: Vec<(String, RawEmotion)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, Option<RawEmotion>>()? {
                let value = value.unwrap_or_default();
                // повторный ключ: место первого, значение последнего
                match out.iter_mut().find(|slot| slot.0 == key) {
                    Some(slot) => slot.1 = value,
                    None => out.push((key, value)),
                }
            }
            Ok(out)
        }
    }

    deserializer.deserialize_any(OrderedVisitor)
}

impl From<RawCatalog> for Catalog {
    fn from(raw: RawCatalog) -> Self {
        let emotions = raw
            .emotions
            .into_iter()
            .map(|(key, e)| EmotionEntry {
                key,
                synonyms: e.synonyms.unwrap_or_default(),
                category: e.kind.as_deref().map(Category::from_label).unwrap_or_default(),
            })
            .collect();

        let fables = raw
            .fables
            .unwrap_or_default()
            .into_iter()
            .map(|(k, v)| (k, v.unwrap_or_default()))
            .collect();

        let mut activities: HashMap<Category, Vec<String>> = HashMap::new();
        for (label, list) in raw.activities.unwrap_or_default() {
            let Some(category) = Category::parse_label(&label) else {
                log::debug!("Активности с неизвестной меткой '{}' пропущены", label);
                continue;
            };
            activities
                .entry(category)
                .or_default()
                .extend(list.unwrap_or_default());
        }

        Self { emotions, fables, activities }
    }
}

impl Catalog {
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: RawCatalog = serde_json::from_str(json)?;
        Ok(raw.into())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json(&data)?;
        log::info!(
            "Каталог загружен из {:?}: {} эмоций, {} наборов басен",
            path,
            catalog.emotions.len(),
            catalog.fables.len()
        );
        Ok(catalog)
    }

    /// Загружает каталог; при любой ошибке — встроенный минимальный набор.
    pub fn load_or_fallback(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(catalog) => catalog,
            Err(e) => {
                log::warn!("Ошибка загрузки каталога, используется встроенный: {}", e);
                Self::fallback()
            }
        }
    }

    /// Встроенный каталог на случай, если файл данных недоступен.
    pub fn fallback() -> Self {
        let emotions = vec![
            EmotionEntry::new("bien", &["bien", "feliz", "contento"], Category::Positive),
            EmotionEntry::new("mal", &["mal", "triste", "deprimido"], Category::Negative),
        ];

        let mut fables = HashMap::new();
        fables.insert(
            "bien".to_string(),
            vec![Fable {
                title: Some("El león y el ratón".into()),
                content: Some("Un día, un león dormía plácidamente...".into()),
                moral: Some("Ningún acto de bondad es insignificante.".into()),
                author: None,
            }],
        );
        fables.insert(
            "mal".to_string(),
            vec![Fable {
                title: Some("El zorro y las uvas".into()),
                content: Some("Un zorro hambriento intentó alcanzar unas uvas...".into()),
                moral: Some("Es fácil despreciar lo que no se puede conseguir.".into()),
                author: None,
            }],
        );

        let mut activities = HashMap::new();
        activities.insert(Category::Negative, vec!["Respira profundamente por 5 minutos.".to_string()]);
        activities.insert(Category::Positive, vec!["Comparte tu alegría con alguien.".to_string()]);
        activities.insert(Category::Neutral, vec!["Toma una pausa consciente de 2 minutos.".to_string()]);

        Self { emotions, fables, activities }
    }

    pub fn emotion(&self, key: &str) -> Option<&EmotionEntry> {
        self.emotions.iter().find(|e| e.key == key)
    }

    /// Категория эмоции по ключу; неизвестный ключ → Neutral.
    pub fn category_of(&self, key: &str) -> Category {
        self.emotion(key).map(|e| e.category).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::from_label("positiva"), Category::Positive);
        assert_eq!(Category::from_label("Negative"), Category::Negative);
        assert_eq!(Category::from_label("neutra"), Category::Neutral);
        assert_eq!(Category::from_label("rara"), Category::Neutral);
        assert_eq!(Category::Negative.to_string(), "negativa");
    }

    #[test]
    fn test_from_json_preserves_order_and_defaults() {
        let json = r#"{
            "emociones": {
                "triste": { "sinonimos": ["triste"], "tipo": "negativa" },
                "raro": { "tipo": "desconocida" },
                "vacio": null,
                "bien": { "sinonimos": ["bien"], "tipo": "positiva" }
            },
            "fabulas": { "bien": [{ "titulo": "T", "contenido": "C" }], "nada": null },
            "actividades": { "neutra": ["pausa"], "negativa": null }
        }"#;
        let c = Catalog::from_json(json).unwrap();
        let keys: Vec<&str> = c.emotions.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["triste", "raro", "vacio", "bien"]);
        assert!(c.emotions[1].synonyms.is_empty());
        assert_eq!(c.emotions[1].category, Category::Neutral);
        assert_eq!(c.emotions[2].category, Category::Neutral);
        assert_eq!(c.fables["bien"][0].title.as_deref(), Some("T"));
        assert!(c.fables["nada"].is_empty());
        assert_eq!(c.activities[&Category::Neutral], vec!["pausa"]);
        assert_eq!(c.category_of("triste"), Category::Negative);
        assert_eq!(c.category_of("inexistente"), Category::Neutral);
    }

    #[test]
    fn test_duplicate_keys_last_wins() {
        let json = r#"{"emociones": {
            "bien": {"sinonimos": ["a"], "tipo": "negativa"},
            "mal": {"sinonimos": ["m"]},
            "bien": {"sinonimos": ["b"], "tipo": "positiva"}
        }}"#;
        let c = Catalog::from_json(json).unwrap();
        let keys: Vec<&str> = c.emotions.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["bien", "mal"]);
        assert_eq!(c.emotions[0].synonyms, vec!["b"]);
        assert_eq!(c.category_of("bien"), Category::Positive);
    }

    #[test]
    fn test_unknown_activity_labels_skipped() {
        let c = Catalog::from_json(r#"{"actividades": {"neutra": ["pausa"], "otra": ["X"]}}"#).unwrap();
        assert_eq!(c.activities.len(), 1);
        assert_eq!(c.activities[&Category::Neutral], vec!["pausa"]);
        assert_eq!(Category::parse_label("otra"), None);
        assert_eq!(Category::parse_label(" Neutral "), Some(Category::Neutral));
    }

    #[test]
    fn test_empty_document() {
        let c = Catalog::from_json("{}").unwrap();
        assert!(c.emotions.is_empty());
        assert!(c.fables.is_empty());
        let c = Catalog::from_json(r#"{"emociones": null}"#).unwrap();
        assert!(c.emotions.is_empty());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(Catalog::from_json("{ not json"), Err(Error::Parse(_))));
    }

    #[test]
    fn test_load_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"emociones": {{"solo": {{"sinonimos": ["solo"], "tipo": "negativa"}}}}}}"#).unwrap();
        let c = Catalog::load(file.path()).unwrap();
        assert_eq!(c.emotions.len(), 1);
        assert_eq!(c.emotions[0].key, "solo");
    }

    #[test]
    fn test_load_or_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("no_existe.json");
        assert!(matches!(Catalog::load(&missing), Err(Error::Io { .. })));

        let c = Catalog::load_or_fallback(&missing);
        assert_eq!(c.emotions.len(), 2);
        assert_eq!(c.category_of("bien"), Category::Positive);
        assert_eq!(c.fables["mal"].len(), 1);
        assert_eq!(c.activities.len(), 3);
    }

    #[test]
    fn test_bundled_data_file() {
        let c = Catalog::from_json(include_str!("../data/fabulas.json")).unwrap();
        assert!(c.emotion("ansioso").is_some());
        assert!(c.fables.contains_key("confundido"));
        for category in [Category::Positive, Category::Negative, Category::Neutral] {
            assert!(!c.activities[&category].is_empty());
        }
    }
}
