use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    notionclip::logging::init().context("init logging")?;

    let cli = notionclip::cli::Cli::parse();
    tracing::debug!(?cli, "parsed arguments");

    match cli.command {
        notionclip::cli::Command::Save(args) => {
            notionclip::save::run(args).await.context("save")?;
        }
        notionclip::cli::Command::Convert(args) => {
            notionclip::convert::run(args).context("convert")?;
        }
        notionclip::cli::Command::Resolve(args) => {
            notionclip::resolve::run(args).await.context("resolve")?;
        }
        notionclip::cli::Command::Check(args) => {
            notionclip::check::run(args).await.context("check")?;
        }
        notionclip::cli::Command::Config { command } => {
            notionclip::config::run(command).context("config")?;
        }
    }

    Ok(())
}
