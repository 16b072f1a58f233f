use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    Save(SaveArgs),
    Convert(ConvertArgs),
    Resolve(ResolveArgs),
    Check(CheckArgs),
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Debug, Args)]
pub struct SaveArgs {
    /// URL of the page the selection was clipped from (must be http/https).
    #[arg(long)]
    pub url: String,

    /// Selected plain text; stdin is read when neither --text nor --text-file is given.
    #[arg(long)]
    pub text: Option<String>,

    /// File containing the selected plain text.
    #[arg(long, conflicts_with = "text")]
    pub text_file: Option<String>,

    /// Markup fragment of the selection; plain text is used when absent.
    #[arg(long)]
    pub html: Option<String>,

    /// File containing the markup fragment.
    #[arg(long, conflicts_with = "html")]
    pub html_file: Option<String>,

    /// Target path under the root page, e.g. "Clips/#today" (default: last used path, then the configured default, then a dated inbox).
    #[arg(long)]
    pub path: Option<String>,

    /// Fail on a missing path segment instead of creating the page.
    #[arg(long)]
    pub no_auto_create: bool,

    /// Directory holding settings.json and state.json.
    #[arg(long, default_value = ".notionclip")]
    pub data_dir: String,
}

#[derive(Debug, Args)]
pub struct ConvertArgs {
    /// Markup fragment to convert; stdin is read when no input flag is given.
    #[arg(long)]
    pub html: Option<String>,

    /// File containing the markup fragment.
    #[arg(long, conflicts_with = "html")]
    pub html_file: Option<String>,

    /// Plain-text fallback used when the markup has no recognizable blocks.
    #[arg(long)]
    pub text: Option<String>,

    /// File containing the plain-text fallback.
    #[arg(long, conflicts_with = "text")]
    pub text_file: Option<String>,
}

#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Slash path under the root page, e.g. "Notes/2026/#today".
    #[arg(long)]
    pub path: String,

    /// Fail on a missing path segment instead of creating the page.
    #[arg(long)]
    pub no_auto_create: bool,

    /// Directory holding settings.json and state.json.
    #[arg(long, default_value = ".notionclip")]
    pub data_dir: String,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Directory holding settings.json and state.json.
    #[arg(long, default_value = ".notionclip")]
    pub data_dir: String,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    Set(ConfigSetArgs),
    Show(ConfigShowArgs),
    ClearPath(ConfigClearPathArgs),
}

#[derive(Debug, Args)]
pub struct ConfigSetArgs {
    /// Integration token used as the bearer credential.
    #[arg(long)]
    pub token: Option<String>,

    /// Root page id or page URL; an id-shaped run is extracted from URLs.
    #[arg(long)]
    pub root_page_id: Option<String>,

    /// Path used when a save names no path and none was remembered.
    #[arg(long)]
    pub default_path: Option<String>,

    /// Override for the API endpoint (empty to reset).
    #[arg(long)]
    pub api_base_url: Option<String>,

    /// Directory holding settings.json and state.json.
    #[arg(long, default_value = ".notionclip")]
    pub data_dir: String,
}

#[derive(Debug, Args)]
pub struct ConfigShowArgs {
    /// Directory holding settings.json and state.json.
    #[arg(long, default_value = ".notionclip")]
    pub data_dir: String,
}

#[derive(Debug, Args)]
pub struct ConfigClearPathArgs {
    /// Directory holding settings.json and state.json.
    #[arg(long, default_value = ".notionclip")]
    pub data_dir: String,
}
