use anyhow::Context as _;
use serde_json::{Value, json};

pub const DEFAULT_BASE_URL: &str = "https://api.notion.com/v1";
pub const NOTION_API_VERSION: &str = "2022-06-28";

const CHILD_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    pub fn new(token: &str, base_url: Option<&str>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .context("build http client")?;
        Ok(Self {
            http,
            base_url: base_url
                .unwrap_or(DEFAULT_BASE_URL)
                .trim_end_matches('/')
                .to_owned(),
            token: token.to_owned(),
        })
    }

    pub async fn find_child_page(
        &self,
        parent_id: &str,
        title: &str,
    ) -> anyhow::Result<Option<String>> {
        // One page of children only; the pagination cursor is not followed.
        let url = format!(
            "{}/blocks/{parent_id}/children?page_size={CHILD_PAGE_SIZE}",
            self.base_url
        );
        let value = self.send(self.http.get(&url), "fetch children").await?;
        let results = value
            .get("results")
            .and_then(Value::as_array)
            .ok_or_else(|| anyhow::anyhow!("missing `results` array in children response"))?;

        let wanted = title.to_lowercase();
        for block in results {
            if block.get("type").and_then(Value::as_str) != Some("child_page") {
                continue;
            }
            let Some(child_title) = block.pointer("/child_page/title").and_then(Value::as_str)
            else {
                continue;
            };
            if child_title.to_lowercase() == wanted {
                return Ok(block.get("id").and_then(Value::as_str).map(str::to_owned));
            }
        }
        Ok(None)
    }

    pub async fn create_child_page(&self, parent_id: &str, title: &str) -> anyhow::Result<String> {
        let url = format!("{}/pages", self.base_url);
        let body = json!({
            "parent": { "page_id": parent_id },
            "properties": {
                "title": { "title": [{ "text": { "content": title } }] }
            }
        });
        let value = self.send(self.http.post(&url).json(&body), "create page").await?;
        value
            .get("id")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| anyhow::anyhow!("missing `id` in create page response"))
    }

    pub async fn append_children(&self, page_id: &str, children: &[Value]) -> anyhow::Result<()> {
        let url = format!("{}/blocks/{page_id}/children", self.base_url);
        let body = json!({ "children": children });
        self.send(self.http.patch(&url).json(&body), "append content")
            .await?;
        Ok(())
    }

    pub async fn retrieve_page_title(&self, page_id: &str) -> anyhow::Result<String> {
        let url = format!("{}/pages/{page_id}", self.base_url);
        let value = self.send(self.http.get(&url), "retrieve page").await?;
        Ok(value
            .pointer("/properties/title/title/0/plain_text")
            .and_then(Value::as_str)
            .unwrap_or("Untitled")
            .to_owned())
    }

    async fn send(&self, request: reqwest::RequestBuilder, what: &str) -> anyhow::Result<Value> {
        let response = request
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_API_VERSION)
            .send()
            .await
            .with_context(|| format!("{what}: send request"))?;
        let status = response.status();
        let raw = response
            .text()
            .await
            .with_context(|| format!("{what}: read response body"))?;
        if !status.is_success() {
            let message = parse_error_message(&raw).unwrap_or_else(|| status.to_string());
            anyhow::bail!("{what} failed: {message}");
        }
        serde_json::from_str(&raw).with_context(|| format!("{what}: parse response"))
    }
}

fn parse_error_message(raw_json: &str) -> Option<String> {
    let value: Value = serde_json::from_str(raw_json).ok()?;
    Some(value.get("message")?.as_str()?.to_owned())
}
