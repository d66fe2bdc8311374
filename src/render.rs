//! Граница показа: ResponseSink + HTML-рендер
//!
//! Любая динамическая строка (текст пользователя, поля басни) проходит через escape_html.

use crate::catalog::Category;
use crate::selection::Response;

const POSITIVE_NOTE: &str = "Tu energía positiva es contagiosa. Compártela con el mundo.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warning,
    Error,
}

/// Получатель результата: «получил ответ — показал».
pub trait ResponseSink {
    fn render(&mut self, response: &Response);
    fn message(&mut self, text: &str, level: MessageLevel);
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Хранит последний отрисованный фрагмент, как содержимое блока ответа.
#[derive(Debug, Default)]
pub struct HtmlRenderer {
    html: String,
}

impl HtmlRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn into_html(self) -> String {
        self.html
    }
}

impl ResponseSink for HtmlRenderer {
    fn render(&mut self, response: &Response) {
        self.html = response_html(response);
    }

    fn message(&mut self, text: &str, level: MessageLevel) {
        let class = match level {
            MessageLevel::Info => "mensaje-info",
            MessageLevel::Warning => "mensaje-warning",
            MessageLevel::Error => "mensaje-error",
        };
        self.html = format!("<div class=\"mensaje {}\">{}</div>", class, escape_html(text));
    }
}

pub fn response_html(response: &Response) -> String {
    let mut html = String::from("<div class=\"fabula\">");

    if let Some(original) = &response.original_text {
        html.push_str(&format!(
            "<div class=\"emotion-detected\"><span class=\"emotion-label\">Detecté que te sientes:</span> {} <small>(escribiste: \"{}\")</small></div>",
            escape_html(&response.result.display_name),
            escape_html(original)
        ));
    }

    let fable = &response.fable;
    html.push_str(&format!(
        "<h2>{}</h2><div class=\"fabula-content\">{}</div>",
        escape_html(fable.title.as_deref().unwrap_or("Fábula")),
        escape_html(fable.content.as_deref().unwrap_or(""))
    ));

    if let Some(moral) = fable.moral.as_deref().filter(|m| !m.is_empty()) {
        html.push_str(&format!("<div class=\"moraleja\">💭 {}</div>", escape_html(moral)));
    }
    if let Some(author) = fable.author.as_deref().filter(|a| !a.is_empty()) {
        html.push_str(&format!("<p class=\"autor\">— {}</p>", escape_html(author)));
    }

    if response.result.category == Category::Positive {
        html.push_str(&format!(
            "<div class=\"propuesta\"><strong>✨ Que siga la alegría:</strong><br>{}</div>",
            POSITIVE_NOTE
        ));
    } else if let Some(activity) = response.suggested_activity() {
        html.push_str(&format!(
            "<div class=\"propuesta\"><strong>💡 Una idea para ti:</strong><br>{}</div>",
            escape_html(activity)
        ));
    }

    html.push_str("</div>");
    html
}
