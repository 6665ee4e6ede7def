//! Regenerate catalog thumbnails.

use photoflow::enumerate::{CatalogScan, SqliteCatalog};
use photoflow::errors::PhotoflowError;
use photoflow::pipeline::{thumbnail_chain, Orchestrator, RunOutcome};
use photoflow::tools::{ImageMagick, ToolSettings};
use photoflow_cli::thumbs::ThumbCli;
use photoflow_cli::{conclude, init_logging, parse_from, reporter, shutdown_signal};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli: ThumbCli = match parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };
    init_logging(cli.verbose);

    let result = run(&cli).await;
    conclude(result, cli.summary_json.as_deref())
}

async fn run(cli: &ThumbCli) -> Result<RunOutcome, PhotoflowError> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let thumb_root = cli.thumb_root(home.as_deref())?;
    let config = cli.config();
    let settings = Arc::new(ToolSettings::load(cli.tools.as_deref())?);

    let source = CatalogScan::new(
        SqliteCatalog::new(&cli.catalog_db),
        thumb_root,
        config.thumbnail_sizes.clone(),
    );
    let chain = thumbnail_chain(Arc::new(ImageMagick::new(settings)));

    let mut orchestrator = Orchestrator::new(config, chain);
    let mut reporter = reporter(cli.quiet);
    orchestrator
        .run(&source, reporter.as_mut(), shutdown_signal())
        .await
}
