use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

pub const STATE_FILE: &str = "state.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalState {
    // Most recent save attempt, successful or not.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_saved_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(STATE_FILE),
        }
    }

    pub fn load(&self) -> anyhow::Result<LocalState> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(LocalState::default());
            }
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("read state file: {}", self.path.display()));
            }
        };
        serde_json::from_str(&raw)
            .with_context(|| format!("parse state file: {}", self.path.display()))
    }

    pub fn save(&self, state: &LocalState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("create data dir: {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(state).context("serialize state")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("write state file: {}", self.path.display()))
    }
}
