use serde_json::{Value, json};

// Overlong text is cut at the limit, not split into a second block.
pub const MAX_TEXT_LEN: usize = 2000;

pub const DEFAULT_CODE_LANGUAGE: &str = "plain text";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContentBlock {
    Heading { level: u8, text: String },
    Quote { text: String },
    BulletedItem { text: String },
    NumberedItem { text: String },
    Code { language: String, text: String },
    Paragraph { text: String },
}

impl ContentBlock {
    pub fn text(&self) -> &str {
        match self {
            Self::Heading { text, .. }
            | Self::Quote { text }
            | Self::BulletedItem { text }
            | Self::NumberedItem { text }
            | Self::Code { text, .. }
            | Self::Paragraph { text } => text,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Heading { level, text } => {
                let kind = match level {
                    1 => "heading_1",
                    2 => "heading_2",
                    _ => "heading_3",
                };
                block_json(kind, json!({ "rich_text": rich_text(text) }))
            }
            Self::Quote { text } => block_json("quote", json!({ "rich_text": rich_text(text) })),
            Self::BulletedItem { text } => {
                block_json("bulleted_list_item", json!({ "rich_text": rich_text(text) }))
            }
            Self::NumberedItem { text } => {
                block_json("numbered_list_item", json!({ "rich_text": rich_text(text) }))
            }
            Self::Code { language, text } => block_json(
                "code",
                json!({ "rich_text": rich_text(text), "language": language }),
            ),
            Self::Paragraph { text } => {
                block_json("paragraph", json!({ "rich_text": rich_text(text) }))
            }
        }
    }
}

// The type name doubles as the payload key, which `json!` cannot express
// with a literal, so the object is assembled by hand.
pub fn block_json(kind: &str, payload: Value) -> Value {
    let mut object = serde_json::Map::new();
    object.insert("object".to_owned(), Value::String("block".to_owned()));
    object.insert("type".to_owned(), Value::String(kind.to_owned()));
    object.insert(kind.to_owned(), payload);
    Value::Object(object)
}

fn rich_text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

pub fn clip(text: &str) -> String {
    if text.chars().count() <= MAX_TEXT_LEN {
        text.to_owned()
    } else {
        text.chars().take(MAX_TEXT_LEN).collect()
    }
}
