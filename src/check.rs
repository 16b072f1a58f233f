use std::path::Path;

use anyhow::Context as _;

use crate::cli::CheckArgs;
use crate::config::Settings;

pub async fn run(args: CheckArgs) -> anyhow::Result<()> {
    let settings = Settings::load(Path::new(&args.data_dir)).context("load settings")?;
    settings.require_configured()?;

    let client = settings.client()?;
    let title = client
        .retrieve_page_title(&settings.root_page_id)
        .await
        .context("test connection")?;

    println!("Connected! Root page: \"{title}\"");
    Ok(())
}
