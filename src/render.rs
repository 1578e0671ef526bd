//! Result rendering.
//!
//! Turns a [`ConversionResult`] into the HTML placed in the results panel,
//! and back out again: [`copy_text`] recovers the text the copy button puts
//! on the clipboard and [`to_terminal`] flattens the HTML for the CLI.
//!
//! # Escaping
//!
//! Markdown is always HTML-escaped so it displays as source. Every other
//! interpolated value follows the renderer's [`ContentPolicy`]: `Trusted`
//! inserts server strings verbatim, `Escaped` escapes them first.

use std::sync::Arc;

use scraper::{Html, Selector};
use serde::Deserialize;

use crate::result::{ConversionResult, ImageItem, MetadataEntry, Table};

/// How server-provided strings are interpolated into HTML.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentPolicy {
    /// Insert values as-is; the server is trusted.
    #[default]
    Trusted,
    /// HTML-escape every value before insertion.
    Escaped,
}

/// Optional syntax highlighter applied to the markdown code block.
pub trait Highlighter: Send + Sync {
    /// Return highlighted inner HTML for a `<code>` block, or `None` to keep
    /// the plain escaped source.
    fn highlight(&self, source: &str, language: &str) -> Option<String>;
}

/// Escape `&`, `<` and `>`.
pub fn escape_html(raw: &str) -> String {
    raw.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(raw: &str) -> String {
    escape_html(raw).replace('"', "&quot;").replace('\'', "&#39;")
}

/// Renders results into panel HTML.
#[derive(Clone, Default)]
pub struct Renderer {
    policy: ContentPolicy,
    highlighter: Option<Arc<dyn Highlighter>>,
}

impl std::fmt::Debug for Renderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Renderer")
            .field("policy", &self.policy)
            .field("highlighter", &self.highlighter.is_some())
            .finish()
    }
}

impl Renderer {
    pub fn new(policy: ContentPolicy) -> Self {
        Self {
            policy,
            highlighter: None,
        }
    }

    #[must_use]
    pub fn with_highlighter(mut self, highlighter: Arc<dyn Highlighter>) -> Self {
        self.highlighter = Some(highlighter);
        self
    }

    pub fn policy(&self) -> ContentPolicy {
        self.policy
    }

    /// Render a result. [`ConversionResult::Empty`] renders as an empty string.
    pub fn render(&self, result: &ConversionResult) -> String {
        match result {
            ConversionResult::Metadata(entries) => self.metadata_table(entries),
            ConversionResult::Text(text) => format!(
                r#"<textarea class="form-control" rows="10" readonly>{}</textarea>"#,
                self.value(text)
            ),
            ConversionResult::Markdown(markdown) => self.markdown_block(markdown),
            ConversionResult::Images(images) => self.image_grid(images),
            ConversionResult::Tables(tables) => self.table_grids(tables),
            ConversionResult::Empty => String::new(),
        }
    }

    fn value(&self, raw: &str) -> String {
        match self.policy {
            ContentPolicy::Trusted => raw.to_string(),
            ContentPolicy::Escaped => escape_html(raw),
        }
    }

    fn attr(&self, raw: &str) -> String {
        match self.policy {
            ContentPolicy::Trusted => raw.to_string(),
            ContentPolicy::Escaped => escape_attr(raw),
        }
    }

    fn metadata_table(&self, entries: &[MetadataEntry]) -> String {
        let mut html = String::from(r#"<table class="table table-striped"><tbody>"#);
        for entry in entries {
            html.push_str(&format!(
                r#"<tr><th scope="row" style="width: 30%">{}</th><td>{}</td></tr>"#,
                self.value(&entry.key),
                self.value(&entry.value)
            ));
        }
        html.push_str("</tbody></table>");
        html
    }

    fn markdown_block(&self, markdown: &str) -> String {
        let (class, body) = match self
            .highlighter
            .as_ref()
            .and_then(|h| h.highlight(markdown, "markdown"))
        {
            Some(highlighted) => ("language-markdown hljs", highlighted),
            None => ("language-markdown", escape_html(markdown)),
        };
        format!(r#"<pre><code class="{class}" style="border-radius: 8px;">{body}</code></pre>"#)
    }

    fn image_grid(&self, images: &[ImageItem]) -> String {
        let mut html = String::from(r#"<div class="row">"#);
        for image in images {
            html.push_str(&format!(
                concat!(
                    r#"<div class="col-md-4 mb-4"><div class="card h-100">"#,
                    r#"<img src="data:{};base64,{}" class="card-img-top" style="max-height: 200px; object-fit: contain; padding: 10px;">"#,
                    r#"<div class="card-body text-center"><p class="card-text small text-muted">{}</p></div>"#,
                    "</div></div>"
                ),
                self.attr(&image.mime),
                self.attr(&image.data),
                self.value(&image.filename)
            ));
        }
        html.push_str("</div>");
        html
    }

    fn table_grids(&self, tables: &[Table]) -> String {
        let mut html = String::new();
        for (index, table) in tables.iter().enumerate() {
            html.push_str(&format!(
                r#"<h5>Table {}</h5><table class="table table-bordered table-sm mb-4">"#,
                index + 1
            ));
            for row in table {
                html.push_str("<tr>");
                for cell in row {
                    html.push_str(&format!("<td>{}</td>", self.value(cell)));
                }
                html.push_str("</tr>");
            }
            html.push_str("</table>");
        }
        html
    }
}

/// Text the copy button puts on the clipboard for the given panel HTML.
///
/// Prefers a `<textarea>`, then a `<code>` block, then the visible text of
/// the whole container (cells tab-separated, one line per row or caption).
pub fn copy_text(html: &str) -> String {
    let fragment = Html::parse_fragment(html);

    for selector in ["textarea", "code"] {
        if let Ok(sel) = Selector::parse(selector) {
            if let Some(element) = fragment.select(&sel).next() {
                return element.text().collect();
            }
        }
    }

    visible_text(&fragment)
}

fn visible_text(fragment: &Html) -> String {
    let (Ok(blocks), Ok(cells)) = (Selector::parse("h5, tr, p"), Selector::parse("th, td")) else {
        return String::new();
    };

    let mut lines = Vec::new();
    for block in fragment.select(&blocks) {
        let line = if block.value().name() == "tr" {
            block
                .select(&cells)
                .map(|cell| cell.text().collect::<String>().trim().to_string())
                .collect::<Vec<_>>()
                .join("\t")
        } else {
            block.text().collect::<String>().trim().to_string()
        };
        lines.push(line);
    }

    if lines.is_empty() {
        return fragment
            .root_element()
            .text()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
    }
    lines.join("\n")
}

/// Flatten rendered HTML to markdown-style text for a terminal.
pub fn to_terminal(html: &str) -> String {
    let md = html2md::parse_html(html);
    md.lines()
        .map(str::trim_end)
        .filter(|l| !l.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}
