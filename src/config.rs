use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::Context as _;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::cli::{ConfigClearPathArgs, ConfigCommand, ConfigSetArgs, ConfigShowArgs};
use crate::notion::NotionClient;

pub const SETTINGS_FILE: &str = "settings.json";

static PAGE_ID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[0-9a-f]{32}|[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}")
        .unwrap()
});

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub root_page_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_path: Option<String>,
    /// Override for the API endpoint, mainly for tests.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,
}

impl Settings {
    pub fn path_in(data_dir: &Path) -> PathBuf {
        data_dir.join(SETTINGS_FILE)
    }

    pub fn load(data_dir: &Path) -> anyhow::Result<Self> {
        let path = Self::path_in(data_dir);
        let raw = match std::fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read settings file: {}", path.display()));
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("parse settings file: {}", path.display()))
    }

    pub fn save(&self, data_dir: &Path) -> anyhow::Result<()> {
        std::fs::create_dir_all(data_dir)
            .with_context(|| format!("create data dir: {}", data_dir.display()))?;
        let path = Self::path_in(data_dir);
        let raw = serde_json::to_string_pretty(self).context("serialize settings")?;
        std::fs::write(&path, raw)
            .with_context(|| format!("write settings file: {}", path.display()))
    }

    pub fn require_configured(&self) -> anyhow::Result<()> {
        if self.token.trim().is_empty() || self.root_page_id.trim().is_empty() {
            anyhow::bail!(
                "token and root page id must be configured first; run `notionclip config set --token <TOKEN> --root-page-id <PAGE>`"
            );
        }
        Ok(())
    }

    pub fn client(&self) -> anyhow::Result<NotionClient> {
        NotionClient::new(&self.token, self.api_base_url.as_deref())
    }
}

// Input with no id-shaped run is handed back trimmed; the API is the one
// to reject it.
pub fn extract_page_id(input: &str) -> String {
    let trimmed = input.trim();
    PAGE_ID_RE
        .find(trimmed)
        .map(|m| m.as_str().to_owned())
        .unwrap_or_else(|| trimmed.to_owned())
}

pub fn run(command: ConfigCommand) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Set(args) => set(args),
        ConfigCommand::Show(args) => show(args),
        ConfigCommand::ClearPath(args) => clear_path(args),
    }
}

fn set(args: ConfigSetArgs) -> anyhow::Result<()> {
    let data_dir = Path::new(&args.data_dir);
    let mut settings = Settings::load(data_dir).context("load settings")?;
    if let Some(token) = args.token {
        settings.token = token.trim().to_owned();
    }
    if let Some(root) = args.root_page_id {
        settings.root_page_id = extract_page_id(&root);
    }
    if let Some(path) = args.default_path {
        let path = path.trim();
        settings.default_path = (!path.is_empty()).then(|| path.to_owned());
    }
    if let Some(base) = args.api_base_url {
        let base = base.trim();
        settings.api_base_url = (!base.is_empty()).then(|| base.to_owned());
    }
    settings.save(data_dir)?;
    println!("Settings saved: {}", Settings::path_in(data_dir).display());
    Ok(())
}

fn show(args: ConfigShowArgs) -> anyhow::Result<()> {
    let settings = Settings::load(Path::new(&args.data_dir)).context("load settings")?;
    let raw = serde_json::to_string_pretty(&settings).context("serialize settings")?;
    println!("{raw}");
    Ok(())
}

fn clear_path(args: ConfigClearPathArgs) -> anyhow::Result<()> {
    let data_dir = Path::new(&args.data_dir);
    let mut settings = Settings::load(data_dir).context("load settings")?;
    settings.last_path = None;
    settings.save(data_dir)?;
    println!("Path cleared - using default");
    Ok(())
}
