//! Resize, watermark and upload a directory of photos.

use photoflow::errors::PhotoflowError;
use photoflow::pipeline::{upload_chain, Orchestrator, RunOutcome, UploadTools};
use photoflow::tools::{CommandUploader, ImageMagick, ToolSettings};
use photoflow_cli::upload::UploadCli;
use photoflow_cli::{conclude, init_logging, parse_from, reporter, shutdown_signal};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli: UploadCli = match parse_from(std::env::args_os()) {
        Ok(cli) => cli,
        Err(code) => return ExitCode::from(code),
    };
    init_logging(cli.verbose);

    let result = run(&cli).await;
    conclude(result, cli.summary_json.as_deref())
}

async fn run(cli: &UploadCli) -> Result<RunOutcome, PhotoflowError> {
    let config = cli.config()?;
    let settings = Arc::new(ToolSettings::load(cli.tools.as_deref())?);

    let magick = Arc::new(ImageMagick::new(Arc::clone(&settings)));
    let tools = UploadTools {
        metadata: magick.clone(),
        transformer: magick.clone(),
        compositor: magick,
        client: Arc::new(CommandUploader::new(settings.uploader.clone())),
    };

    let mut orchestrator = Orchestrator::new(config, upload_chain(tools, &settings));
    let mut reporter = reporter(cli.quiet);
    orchestrator
        .run(&cli.scan(), reporter.as_mut(), shutdown_signal())
        .await
}
