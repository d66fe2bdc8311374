//! Нормализация текста и токенизация
//!
//! - lowercase + NFD, комбинирующие диакритики выбрасываются ("depresión" == "depresion")
//! - кавычки (прямые и типографские) удаляются
//! - пробельные серии схлопываются, края обрезаются
//! - пробелом считается и U+FEFF (BOM), как в `\s` браузера
//! - токенизатор заменяет regex `\b`: токен = максимальная серия буквенно-цифровых символов и `_`

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

const QUOTES: &[char] = &['"', '\'', '\u{2018}', '\u{2019}', '\u{201c}', '\u{201d}'];

/// Нормализует текст для сравнения. Чистая и тотальная функция:
/// пустой или пробельный ввод даёт пустую строку.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c) && !QUOTES.contains(c))
        .collect();

    let mut out = String::with_capacity(folded.len());
    for word in folded.split(is_space).filter(|w| !w.is_empty()) {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// Разбивает (нормализованный) текст на слова.
/// Разделителем считается любой символ, кроме буквенно-цифровых и `_`.
pub fn tokenize(text: &str) -> Vec<&str> {
    text.split(|c: char| !(c.is_alphanumeric() || c == '_'))
        .filter(|t| !t.is_empty())
        .collect()
}

/// Проверяет, встречается ли `needle` как непрерывная подпоследовательность токенов.
pub(crate) fn contains_tokens<S: AsRef<str>>(haystack: &[&str], needle: &[S]) -> bool {
    match needle.len() {
        0 => false,
        1 => haystack.contains(&needle[0].as_ref()),
        n => haystack
            .windows(n)
            .any(|w| w.iter().zip(needle).all(|(a, b)| *a == b.as_ref())),
    }
}
