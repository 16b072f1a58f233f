use std::sync::LazyLock;

use regex::Regex;

static LINE_BREAK_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static PARAGRAPH_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</p>").unwrap());
static DIVISION_CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)</div>").unwrap());
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").unwrap());
static HSPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t]+").unwrap());
static NUMERIC_ENTITY_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#(\d+);").unwrap());

pub fn normalize_newlines(markup: &str) -> String {
    markup.replace("\r\n", "\n").replace('\r', "\n")
}

pub fn strip_markup(markup: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(markup, "\n");
    let text = PARAGRAPH_CLOSE_RE.replace_all(&text, "\n");
    let text = DIVISION_CLOSE_RE.replace_all(&text, "\n");
    let text = TAG_RE.replace_all(&text, "");
    let text = HSPACE_RE.replace_all(&text, " ");
    decode_entities(text.trim())
}

// Keeps runs of spaces and tabs so code indentation comes through.
pub fn strip_code_markup(markup: &str) -> String {
    let text = LINE_BREAK_RE.replace_all(markup, "\n");
    let text = TAG_RE.replace_all(&text, "");
    decode_entities(text.trim())
}

pub fn decode_entities(text: &str) -> String {
    // Fixed sequence, numeric entities last: pre-escaped input like
    // `&amp;lt;` decodes all the way to `<`.
    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'");
    NUMERIC_ENTITY_RE
        .replace_all(&decoded, |caps: &regex::Captures| {
            caps[1]
                .parse::<u32>()
                .ok()
                .and_then(char::from_u32)
                .map(String::from)
                .unwrap_or_default()
        })
        .into_owned()
}
