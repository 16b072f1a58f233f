use std::sync::LazyLock;

use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpanKind {
    Code,
    Heading(u8),
    Quote,
    BulletedList,
    NumberedList,
    Paragraph,
    Division,
    ListItem,
}

#[derive(Debug, Clone)]
pub struct MarkupSpan {
    pub kind: SpanKind,
    pub start: usize,
    pub end: usize,
    /// Inner markup captured by the matcher; `raw` is the full match.
    pub body: String,
    pub raw: String,
    pub language: Option<String>,
}

static LANGUAGE_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)class=["'][^"']*language-([A-Za-z0-9_+#.-]+)"#).unwrap());

// Matchers are listed most-specific first. The order only matters for
// candidates starting at the same offset: the stable sort below keeps
// the earlier matcher in front, and the containment filter drops the rest.
static MATCHERS: LazyLock<Vec<(SpanKind, Regex)>> = LazyLock::new(|| {
    fn re(pattern: &str) -> Regex {
        Regex::new(pattern).unwrap()
    }

    let mut matchers = vec![
        (SpanKind::Code, re(r"(?is)<pre[^>]*>\s*<code[^>]*>(.*?)</code>\s*</pre>")),
        (SpanKind::Code, re(r"(?is)<code[^>]*>\s*<pre[^>]*>(.*?)</pre>\s*</code>")),
        (SpanKind::Code, re(r"(?is)<pre[^>]*>(.*?)</pre>")),
        (SpanKind::Code, re(r"(?is)<figure[^>]*>.*?<pre[^>]*>(.*?)</pre>.*?</figure>")),
        (
            SpanKind::Code,
            re(r#"(?is)<div[^>]*class=["'][^"']*(?:code|highlight)[^"']*["'][^>]*>(.*?)</div>"#),
        ),
    ];
    for level in 1u8..=6 {
        let resolved = level.min(3);
        matchers.push((
            SpanKind::Heading(resolved),
            re(&format!(r"(?is)<h{level}[^>]*>(.*?)</h{level}>")),
        ));
    }
    matchers.extend([
        (SpanKind::Quote, re(r"(?is)<blockquote[^>]*>(.*?)</blockquote>")),
        (SpanKind::BulletedList, re(r"(?is)<ul[^>]*>(.*?)</ul>")),
        (SpanKind::NumberedList, re(r"(?is)<ol[^>]*>(.*?)</ol>")),
        (SpanKind::Paragraph, re(r"(?is)<p[^>]*>(.*?)</p>")),
        (SpanKind::Division, re(r"(?is)<div[^>]*>(.*?)</div>")),
        (SpanKind::ListItem, re(r"(?is)<li[^>]*>(.*?)</li>")),
    ]);
    matchers
});

pub fn classify(markup: &str) -> Vec<MarkupSpan> {
    let mut candidates: Vec<MarkupSpan> = Vec::new();
    for (kind, regex) in MATCHERS.iter() {
        for caps in regex.captures_iter(markup) {
            candidates.push(build_span(kind, &caps));
        }
    }

    // Stable by construction: equal starts keep matcher priority order.
    candidates.sort_by_key(|span| span.start);

    let mut spans: Vec<MarkupSpan> = Vec::new();
    for candidate in candidates {
        // Boundary equality counts as containment, so a list swallows
        // its items and fenced code swallows the bare <pre> inside it.
        let nested = spans
            .iter()
            .any(|prev| candidate.start >= prev.start && candidate.end <= prev.end);
        if !nested {
            spans.push(candidate);
        }
    }
    spans
}

fn build_span(kind: &SpanKind, caps: &Captures) -> MarkupSpan {
    let full = caps.get(0).unwrap();
    let body = caps.get(1).map(|m| m.as_str().to_owned()).unwrap_or_default();
    let language = if *kind == SpanKind::Code {
        let body_start = caps.get(1).map_or(full.end(), |m| m.start());
        let opening = &full.as_str()[..body_start - full.start()];
        LANGUAGE_CLASS_RE.captures(opening).map(|c| c[1].to_owned())
    } else {
        None
    };
    MarkupSpan {
        kind: kind.clone(),
        start: full.start(),
        end: full.end(),
        body,
        raw: full.as_str().to_owned(),
        language,
    }
}
