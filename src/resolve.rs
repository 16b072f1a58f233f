use std::path::Path;
use std::sync::LazyLock;

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use regex::Regex;

use crate::cli::ResolveArgs;
use crate::config::Settings;
use crate::notion::NotionClient;

static TODAY_TOKEN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)#today").unwrap());

pub fn split_segments(path: &str) -> Vec<&str> {
    path.split('/')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect()
}

pub fn expand_path_tokens(path: &str, today: NaiveDate) -> String {
    let formatted = today.format("%d-%B-%Y").to_string();
    TODAY_TOKEN_RE
        .replace_all(path, formatted.as_str())
        .into_owned()
}

pub fn default_clip_path(today: NaiveDate) -> String {
    today.format("Inbox/%Y/%B/%d").to_string()
}

pub async fn resolve_path(
    client: &NotionClient,
    root_page_id: &str,
    path: &str,
    auto_create: bool,
) -> anyhow::Result<String> {
    let mut current = root_page_id.to_owned();
    for segment in split_segments(path) {
        let found = client
            .find_child_page(&current, segment)
            .await
            .with_context(|| format!("look up path segment: {segment}"))?;
        match found {
            Some(child_id) => {
                tracing::debug!(segment, page_id = %child_id, "found existing page");
                current = child_id;
            }
            None if auto_create => {
                let child_id = client
                    .create_child_page(&current, segment)
                    .await
                    .with_context(|| format!("create path segment: {segment}"))?;
                tracing::debug!(segment, page_id = %child_id, "created page");
                current = child_id;
            }
            None => anyhow::bail!("page not found: {segment}"),
        }
    }
    Ok(current)
}

pub async fn run(args: ResolveArgs) -> anyhow::Result<()> {
    let settings = Settings::load(Path::new(&args.data_dir)).context("load settings")?;
    settings.require_configured()?;
    let client = settings.client()?;

    let path = expand_path_tokens(&args.path, Local::now().date_naive());
    let page_id = resolve_path(
        &client,
        &settings.root_page_id,
        &path,
        !args.no_auto_create,
    )
    .await?;
    println!("{page_id}");
    Ok(())
}
