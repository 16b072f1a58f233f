use std::io::Read as _;
use std::sync::LazyLock;

use anyhow::Context as _;
use regex::Regex;
use serde_json::Value;

use crate::blocks::{ContentBlock, DEFAULT_CODE_LANGUAGE, clip};
use crate::classify::{MarkupSpan, SpanKind, classify};
use crate::cli::ConvertArgs;
use crate::normalize::{normalize_newlines, strip_code_markup, strip_markup};

static LIST_ITEM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)<li[^>]*>(.*?)</li>").unwrap());
static PARAGRAPH_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n\s*\n").unwrap());

/// Converts a clipped markup fragment into structured blocks, falling
/// back to the plain-text selection when nothing in it is recognizable.
pub fn html_to_blocks(markup: &str, plain_text: &str) -> Vec<ContentBlock> {
    if markup.trim().is_empty() {
        return text_blocks(plain_text);
    }
    let markup = normalize_newlines(markup);
    let mut blocks = Vec::new();
    for span in classify(&markup) {
        emit_span(&span, &mut blocks);
    }
    if blocks.is_empty() {
        tracing::debug!("no recognizable regions in markup, falling back to plain text");
        return text_blocks(plain_text);
    }
    blocks
}

pub fn text_blocks(text: &str) -> Vec<ContentBlock> {
    let paragraphs: Vec<ContentBlock> = PARAGRAPH_BREAK_RE
        .split(text)
        .filter(|part| !part.trim().is_empty())
        .map(|part| ContentBlock::Paragraph {
            text: clip(part.trim()),
        })
        .collect();
    if paragraphs.is_empty() {
        return vec![ContentBlock::Paragraph { text: clip(text) }];
    }
    paragraphs
}

fn emit_span(span: &MarkupSpan, blocks: &mut Vec<ContentBlock>) {
    match &span.kind {
        SpanKind::Heading(level) => {
            let text = strip_markup(&span.body);
            // Stripping trims before entities decode, so a body like
            // &nbsp; comes back as bare whitespace; re-check the trim.
            if !text.trim().is_empty() {
                blocks.push(ContentBlock::Heading {
                    level: *level,
                    text: clip(&text),
                });
            }
        }
        SpanKind::Quote => {
            let text = strip_markup(&span.body);
            if !text.trim().is_empty() {
                blocks.push(ContentBlock::Quote { text: clip(&text) });
            }
        }
        SpanKind::BulletedList => {
            for item in list_items(&span.body) {
                blocks.push(ContentBlock::BulletedItem { text: item });
            }
        }
        SpanKind::NumberedList => {
            for item in list_items(&span.body) {
                blocks.push(ContentBlock::NumberedItem { text: item });
            }
        }
        SpanKind::ListItem => {
            let text = strip_markup(&span.body);
            if !text.trim().is_empty() {
                blocks.push(ContentBlock::BulletedItem { text: clip(&text) });
            }
        }
        SpanKind::Code => {
            let text = strip_code_markup(&span.body);
            if !text.trim().is_empty() {
                blocks.push(ContentBlock::Code {
                    language: span
                        .language
                        .clone()
                        .unwrap_or_else(|| DEFAULT_CODE_LANGUAGE.to_owned()),
                    text: clip(&text),
                });
            }
        }
        SpanKind::Paragraph | SpanKind::Division => {
            let text = strip_markup(&span.body);
            if text.trim().is_empty() {
                return;
            }
            if has_code_marker(&span.raw) || looks_like_code(&text) {
                blocks.push(ContentBlock::Code {
                    language: DEFAULT_CODE_LANGUAGE.to_owned(),
                    text: clip(&text),
                });
            } else {
                blocks.push(ContentBlock::Paragraph { text: clip(&text) });
            }
        }
    }
}

fn list_items(body: &str) -> Vec<String> {
    LIST_ITEM_RE
        .captures_iter(body)
        .map(|caps| strip_markup(&caps[1]))
        .filter(|item| !item.trim().is_empty())
        .map(|item| clip(&item))
        .collect()
}

fn has_code_marker(raw: &str) -> bool {
    raw.to_ascii_lowercase().contains("<code")
}

// Deliberately approximate; prefix sniffing rather than lexing.
pub fn looks_like_code(text: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "//",
        "/*",
        "# ",
        "#!",
        "{",
        "}",
        "[",
        "function ",
        "const ",
        "let ",
        "var ",
        "def ",
        "fn ",
        "class ",
        "import ",
        "from ",
        "pub ",
        "use ",
        "return ",
        "if (",
        "for (",
        "while (",
    ];

    let trimmed = text.trim_start();
    if PREFIXES.iter().any(|prefix| trimmed.starts_with(prefix)) {
        return true;
    }
    if trimmed.contains("=>") || trimmed.contains("->") {
        return true;
    }
    // Escaped markup like &lt;div&gt; decodes back to a tag-like token.
    trimmed.starts_with('<')
}

pub fn run(args: ConvertArgs) -> anyhow::Result<()> {
    let markup = read_optional(args.html, args.html_file, "markup")?;
    let text = read_optional(args.text, args.text_file, "text")?;

    let markup = match markup {
        Some(markup) => markup,
        None if text.is_none() => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read markup from stdin")?;
            buf
        }
        None => String::new(),
    };
    let text = text.unwrap_or_default();
    if markup.trim().is_empty() && text.trim().is_empty() {
        anyhow::bail!("nothing to convert; pass --html or --text, or pipe markup on stdin");
    }

    let blocks = html_to_blocks(&markup, &text);
    tracing::info!(blocks = blocks.len(), "converted fragment");
    let values: Vec<Value> = blocks.iter().map(ContentBlock::to_json).collect();
    println!("{}", serde_json::to_string_pretty(&values)?);
    Ok(())
}

fn read_optional(
    inline: Option<String>,
    file: Option<String>,
    what: &str,
) -> anyhow::Result<Option<String>> {
    if let Some(inline) = inline {
        return Ok(Some(inline));
    }
    if let Some(path) = file {
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("read {what} file: {path}"))?;
        return Ok(Some(raw));
    }
    Ok(None)
}
