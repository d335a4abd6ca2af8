//! Standalone HTML rendering of an enhanced recipe.

use log::warn;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::path::{Path, PathBuf};

use crate::enhancer::image_to_data_uri;

static IMAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)\s]+)\)").expect("valid image regex"));
static BOLD: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));
static ITALIC: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*(.+?)\*").expect("valid italic regex"));
static ORDERED_ITEM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+[.)]\s+").expect("valid list regex"));
static IMG_SRC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"<img src="([^"]+)""#).expect("valid src regex"));

const STYLESHEET: &str = r#"
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body {
            font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif;
            line-height: 1.6;
            color: #333;
            background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
            padding: 20px;
        }
        .recipe-container {
            max-width: 800px;
            margin: 0 auto;
            background: white;
            padding: 40px;
            border-radius: 12px;
            box-shadow: 0 10px 40px rgba(0, 0, 0, 0.2);
        }
        h1 { color: #2c3e50; font-size: 2.5em; margin-bottom: 20px; border-bottom: 3px solid #667eea; }
        h2 { color: #34495e; font-size: 1.8em; margin: 30px 0 15px; border-bottom: 2px solid #ecf0f1; }
        h3 { color: #555; font-size: 1.4em; margin: 20px 0 10px; }
        p { margin-bottom: 15px; line-height: 1.8; }
        ul, ol { margin: 15px 0; padding-left: 30px; }
        li { margin-bottom: 8px; }
        img { max-width: 32px; max-height: 32px; vertical-align: middle; margin: 0 4px; }
        @media print {
            body { background: white; padding: 0; }
            .recipe-container { box-shadow: none; padding: 20px; }
        }
        @media (max-width: 600px) {
            .recipe-container { padding: 20px; }
            h1 { font-size: 2em; }
        }
"#;

#[derive(Debug, Clone, Copy, PartialEq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn close_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "</ul>",
            ListKind::Ordered => "</ol>",
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct HtmlExporter {
    /// Directory relative image paths are resolved against when embedding
    embed_from: Option<PathBuf>,
}

impl HtmlExporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rewrite local image sources into data URIs, resolving relative
    /// paths against `base_dir`.
    pub fn with_embedded_images(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            embed_from: Some(base_dir.into()),
        }
    }

    pub fn export(&self, markdown: &str, title: &str) -> String {
        let mut body = markdown_to_html(markdown);
        if let Some(base_dir) = &self.embed_from {
            body = embed_images(&body, base_dir);
        }

        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <style>{STYLESHEET}    </style>
</head>
<body>
    <div class="recipe-container">
{body}
    </div>
</body>
</html>
"#,
            title = html_escape::encode_text(title),
        )
    }
}

/// Line-oriented markdown to HTML. Covers headings, lists, paragraphs,
/// emphasis and images; anything else renders as a paragraph.
pub fn markdown_to_html(markdown: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut open_list: Option<ListKind> = None;

    for line in markdown.lines() {
        let trimmed = line.trim();

        let item = if let Some(rest) = trimmed
            .strip_prefix("- ")
            .or_else(|| trimmed.strip_prefix("* "))
        {
            Some((ListKind::Unordered, rest))
        } else {
            ORDERED_ITEM
                .find(trimmed)
                .map(|m| (ListKind::Ordered, &trimmed[m.end()..]))
        };

        if let Some((kind, content)) = item {
            if open_list != Some(kind) {
                if let Some(previous) = open_list.take() {
                    out.push(previous.close_tag().to_string());
                }
                out.push(
                    match kind {
                        ListKind::Unordered => "<ul>",
                        ListKind::Ordered => "<ol>",
                    }
                    .to_string(),
                );
                open_list = Some(kind);
            }
            out.push(format!("    <li>{}</li>", render_inline(content)));
            continue;
        }

        if let Some(previous) = open_list.take() {
            out.push(previous.close_tag().to_string());
        }

        if trimmed.is_empty() {
            continue;
        }

        match heading(trimmed) {
            Some((level, text)) => {
                out.push(format!("<h{level}>{}</h{level}>", render_inline(text)))
            }
            None => out.push(format!("<p>{}</p>", render_inline(trimmed))),
        }
    }

    if let Some(previous) = open_list {
        out.push(previous.close_tag().to_string());
    }

    out.join("\n")
}

fn heading(line: &str) -> Option<(usize, &str)> {
    let level = line.chars().take_while(|&c| c == '#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    rest.starts_with(char::is_whitespace)
        .then(|| (level, rest.trim()))
}

/// Turn markdown images into tags with attribute-encoded values, and escape
/// the text between them.
fn render_inline(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for caps in IMAGE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        out.push_str(&render_text(&text[last..whole.start()]));
        out.push_str(&format!(
            r#"<img src="{}" alt="{}">"#,
            html_escape::encode_double_quoted_attribute(&caps[2]),
            html_escape::encode_double_quoted_attribute(&caps[1])
        ));
        last = whole.end();
    }
    out.push_str(&render_text(&text[last..]));
    out
}

fn render_text(text: &str) -> String {
    let escaped = html_escape::encode_text(text);
    let bold = BOLD.replace_all(&escaped, "<strong>$1</strong>");
    ITALIC.replace_all(&bold, "<em>$1</em>").into_owned()
}

/// Replace local `<img src>` paths with inline data URIs. Sources that are
/// already URIs or cannot be read are left alone.
pub fn embed_images(html: &str, base_dir: &Path) -> String {
    IMG_SRC
        .replace_all(html, |caps: &Captures| {
            let src = &caps[1];
            if src.starts_with("data:") || src.contains("://") {
                return caps[0].to_string();
            }
            let decoded = html_escape::decode_html_entities(src);
            let path = base_dir.join(decoded.as_ref());
            match image_to_data_uri(&path) {
                Ok(uri) => format!(r#"<img src="{}""#, uri),
                Err(e) => {
                    warn!("Could not embed {}: {}", path.display(), e);
                    caps[0].to_string()
                }
            }
        })
        .into_owned()
}
