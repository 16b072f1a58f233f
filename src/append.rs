use anyhow::Context as _;
use chrono::{DateTime, Local};
use serde_json::{Value, json};

use crate::blocks::{ContentBlock, block_json};
use crate::convert::html_to_blocks;
use crate::notion::NotionClient;
use crate::state::{LocalState, StateStore};

pub const MAX_BLOCKS_PER_REQUEST: usize = 100;

pub async fn append_clip(
    client: &NotionClient,
    store: &StateStore,
    page_id: &str,
    text: &str,
    html: &str,
    source_url: &str,
    now: DateTime<Local>,
) -> anyhow::Result<usize> {
    let state = store.load().context("load local state")?;
    let include_source = state.last_saved_url.as_deref() != Some(source_url);
    // Recorded before the request goes out: a failed append still counts
    // as the most recent attempt for source-line suppression.
    store
        .save(&LocalState {
            last_saved_url: Some(source_url.to_owned()),
        })
        .context("record last saved url")?;

    let content: Vec<Value> = html_to_blocks(html, text)
        .iter()
        .map(ContentBlock::to_json)
        .collect();
    let batch = assemble_batch(header_blocks(source_url, include_source, now), content);
    tracing::debug!(blocks = batch.len(), include_source, "assembled append batch");
    client.append_children(page_id, &batch).await?;
    Ok(batch.len())
}

// Spacer paragraph, divider, source line for a fresh URL, date/time line.
pub fn header_blocks(source_url: &str, include_source: bool, now: DateTime<Local>) -> Vec<Value> {
    let mut blocks = vec![
        block_json("paragraph", json!({ "rich_text": [] })),
        block_json("divider", json!({})),
    ];
    if include_source {
        blocks.push(block_json(
            "paragraph",
            json!({
                "rich_text": [
                    {
                        "type": "text",
                        "text": { "content": "source" },
                        "annotations": { "code": true, "color": "red" }
                    },
                    { "type": "text", "text": { "content": " : " } },
                    {
                        "type": "text",
                        "text": { "content": source_url, "link": { "url": source_url } }
                    },
                ]
            }),
        ));
    }

    let date = now.format("%-m/%-d/%Y").to_string();
    let time = now.format("%-I:%M %P").to_string();
    blocks.push(block_json(
        "paragraph",
        json!({
            "rich_text": [
                { "type": "text", "text": { "content": date }, "annotations": { "code": true } },
                { "type": "text", "text": { "content": "  " } },
                { "type": "text", "text": { "content": time }, "annotations": { "code": true } },
            ]
        }),
    ));
    blocks
}

pub fn assemble_batch(header: Vec<Value>, content: Vec<Value>) -> Vec<Value> {
    let mut batch = header;
    batch.extend(content);
    batch.truncate(MAX_BLOCKS_PER_REQUEST);
    batch
}
