//! Подбор басни и активности по результату классификации

use crate::catalog::{Catalog, Category, Fable};
use crate::classifier::ClassificationResult;
use crate::error::{Error, Result};
use rand::seq::IndexedRandom;
use rand::Rng;

/// Ключи, чьи басни показываются, если для эмоции басен нет.
const FALLBACK_FABLE_KEYS: &[&str] = &["confundido", "bien"];

/// Всё, что нужно показать пользователю.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub result: ClassificationResult,
    pub fable: Fable,
    pub activity: Option<String>,
    /// Исходный текст пользователя; None для быстрых кнопок
    pub original_text: Option<String>,
}

impl Response {
    /// Активность предлагается только для негативных и нейтральных эмоций.
    pub fn suggested_activity(&self) -> Option<&str> {
        match self.result.category {
            Category::Positive => None,
            _ => self.activity.as_deref(),
        }
    }
}

fn fables_for<'a>(catalog: &'a Catalog, key: &str) -> Option<&'a Vec<Fable>> {
    catalog.fables.get(key).filter(|list| !list.is_empty())
}

pub fn select_fable<'a, R: Rng + ?Sized>(catalog: &'a Catalog, key: &str, rng: &mut R) -> Result<&'a Fable> {
    let list = fables_for(catalog, key)
        .or_else(|| {
            log::debug!("Нет басен для '{}', используются резервные", key);
            FALLBACK_FABLE_KEYS.iter().find_map(|k| fables_for(catalog, k))
        })
        .ok_or_else(|| Error::NoFables { key: key.to_string() })?;

    list.choose(rng).ok_or_else(|| Error::NoFables { key: key.to_string() })
}

pub fn select_activity<'a, R: Rng + ?Sized>(catalog: &'a Catalog, category: Category, rng: &mut R) -> Option<&'a str> {
    let list = catalog
        .activities
        .get(&category)
        .or_else(|| catalog.activities.get(&Category::Neutral))?;
    list.choose(rng).map(String::as_str)
}

/// Собирает ответ для результата классификации.
pub fn build_response<R: Rng + ?Sized>(
    catalog: &Catalog,
    result: ClassificationResult,
    original_text: Option<&str>,
    rng: &mut R,
) -> Result<Response> {
    let fable = select_fable(catalog, &result.emotion_key, rng)?.clone();
    let activity = select_activity(catalog, result.category, rng).map(str::to_string);
    Ok(Response {
        result,
        fable,
        activity,
        original_text: original_text.map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn fable(title: &str) -> Fable {
        Fable {
            title: Some(title.to_string()),
            ..Default::default()
        }
    }

    fn catalog() -> Catalog {
        let mut fables = HashMap::new();
        fables.insert("triste".to_string(), vec![fable("a"), fable("b"), fable("c")]);
        fables.insert("vacio".to_string(), vec![]);
        fables.insert("confundido".to_string(), vec![fable("reflexion")]);
        let mut activities = HashMap::new();
        activities.insert(Category::Neutral, vec!["pausa".to_string()]);
        activities.insert(Category::Negative, vec!["respira".to_string()]);
        Catalog {
            emotions: vec![],
            fables,
            activities,
        }
    }

    #[test]
    fn test_select_fable_for_key() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let f = select_fable(&c, "triste", &mut rng).unwrap();
            assert!(["a", "b", "c"].contains(&f.title.as_deref().unwrap()));
        }
    }

    #[test]
    fn test_select_fable_fallback_chain() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(1);
        assert_eq!(select_fable(&c, "vacio", &mut rng).unwrap().title.as_deref(), Some("reflexion"));
        assert_eq!(select_fable(&c, "desconocido", &mut rng).unwrap().title.as_deref(), Some("reflexion"));

        let mut c = catalog();
        c.fables.remove("confundido");
        c.fables.insert("bien".to_string(), vec![fable("alegria")]);
        assert_eq!(select_fable(&c, "vacio", &mut rng).unwrap().title.as_deref(), Some("alegria"));
    }

    #[test]
    fn test_select_fable_none_available() {
        let c = Catalog::default();
        let mut rng = StdRng::seed_from_u64(1);
        assert!(matches!(
            select_fable(&c, "bien", &mut rng),
            Err(Error::NoFables { key }) if key == "bien"
        ));
    }

    #[test]
    fn test_select_activity() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(select_activity(&c, Category::Negative, &mut rng), Some("respira"));
        // для positiva списка нет — берётся нейтральный
        assert_eq!(select_activity(&c, Category::Positive, &mut rng), Some("pausa"));
        assert_eq!(select_activity(&Catalog::default(), Category::Neutral, &mut rng), None);
    }

    #[test]
    fn test_build_response() {
        let c = catalog();
        let mut rng = StdRng::seed_from_u64(9);
        let result = ClassificationResult::new("triste", "triste", Category::Negative);
        let r = build_response(&c, result, Some("Estoy triste"), &mut rng).unwrap();
        assert_eq!(r.activity.as_deref(), Some("respira"));
        assert_eq!(r.suggested_activity(), Some("respira"));
        assert_eq!(r.original_text.as_deref(), Some("Estoy triste"));

        let result = ClassificationResult::new("confundido", "feliz", Category::Positive);
        let r = build_response(&c, result, None, &mut rng).unwrap();
        assert_eq!(r.suggested_activity(), None);
    }
}
