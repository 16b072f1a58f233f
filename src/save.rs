use std::io::Read as _;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::{Local, NaiveDate};
use url::Url;

use crate::append::append_clip;
use crate::cli::SaveArgs;
use crate::config::Settings;
use crate::resolve::{default_clip_path, expand_path_tokens, resolve_path};
use crate::state::StateStore;

pub async fn run(args: SaveArgs) -> anyhow::Result<()> {
    let data_dir = PathBuf::from(&args.data_dir);
    let mut settings = Settings::load(&data_dir).context("load settings")?;
    settings.require_configured()?;

    let text = read_selection(args.text, args.text_file)?;
    if text.trim().is_empty() {
        anyhow::bail!("no text to save");
    }
    let html = read_fragment(args.html, args.html_file)?;

    let source_url = Url::parse(&args.url).context("parse --url")?;
    if !matches!(source_url.scheme(), "http" | "https") {
        anyhow::bail!("--url must be http or https");
    }

    let now = Local::now();
    let explicit = args
        .path
        .as_deref()
        .map(str::trim)
        .filter(|path| !path.is_empty())
        .map(str::to_owned);
    let target_path = effective_path(explicit.as_deref(), &settings, now.date_naive());
    tracing::info!(path = %target_path, "saving clip");

    let client = settings.client()?;
    let page_id = resolve_path(
        &client,
        &settings.root_page_id,
        &target_path,
        !args.no_auto_create,
    )
    .await?;

    let store = StateStore::new(&data_dir);
    let appended = append_clip(&client, &store, &page_id, &text, &html, &args.url, now).await?;
    tracing::info!(blocks = appended, page_id = %page_id, "clip appended");

    // Only an explicitly passed path is remembered for the next save.
    if let Some(path) = explicit {
        settings.last_path = Some(path);
        settings.save(&data_dir).context("remember last path")?;
    }

    println!("Saved to: {target_path}");
    Ok(())
}

fn effective_path(explicit: Option<&str>, settings: &Settings, today: NaiveDate) -> String {
    let chosen = explicit
        .map(str::to_owned)
        .or_else(|| non_blank(settings.last_path.as_deref()))
        .or_else(|| non_blank(settings.default_path.as_deref()))
        .unwrap_or_else(|| default_clip_path(today));
    // Tokens expand after the choice, so a stored path keeps its #today
    // literal and re-expands on every save.
    expand_path_tokens(&chosen, today)
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

fn read_selection(inline: Option<String>, file: Option<String>) -> anyhow::Result<String> {
    if let Some(inline) = inline {
        return Ok(inline);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path).with_context(|| format!("read text file: {path}"));
    }
    let mut buf = String::new();
    std::io::stdin()
        .read_to_string(&mut buf)
        .context("read selection from stdin")?;
    Ok(buf)
}

fn read_fragment(inline: Option<String>, file: Option<String>) -> anyhow::Result<String> {
    if let Some(inline) = inline {
        return Ok(inline);
    }
    if let Some(path) = file {
        return std::fs::read_to_string(&path)
            .with_context(|| format!("read markup file: {path}"));
    }
    Ok(String::new())
}
