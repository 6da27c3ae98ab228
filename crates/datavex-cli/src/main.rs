//! Terminal front end for the DataVex pipeline: runs a keyword through the
//! backend, renders stage progress, and optionally exports the output.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use datavex_client::prelude::*;
use datavex_client::{export_output, init_observability};
use tracing::info;

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "datavex",
    version,
    about = "Run the DataVex growth pipeline and watch its stages"
)]
struct Args {
    /// Keyword to run the pipeline for.
    keyword: String,

    /// Backend base URL (overrides DATAVEX_BASE_URL).
    #[arg(long)]
    base_url: Option<String>,

    /// Use the one-shot endpoint instead of streaming.
    #[arg(long)]
    sync: bool,

    /// Export the final output as JSON into this directory.
    #[arg(long, value_name = "DIR")]
    export: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    init_observability();
    let args = Args::parse();

    match run(args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = ClientConfig::from_env();
    if let Some(base_url) = args.base_url {
        config = config.base_url(base_url);
    }
    let client = PipelineClient::new(config)?;

    let output = if args.sync {
        info!(keyword = %args.keyword, "running pipeline (sync)");
        client.run_sync(&args.keyword).await?
    } else {
        stream_run(&client, &args.keyword).await?
    };

    print!("{}", render::summary(&output));
    if let Some(dir) = args.export {
        let path = export_output(&output, dir)?;
        println!("exported to {}", path.display());
    }
    Ok(())
}

async fn stream_run(
    client: &PipelineClient,
    keyword: &str,
) -> Result<PipelineOutput, ClientError> {
    let mut run = client.start(keyword).await?;
    println!("{}", render::stage_board(run.session()));

    while let Some(event) = run.next_event().await? {
        println!("{}", render::progress_line(run.session()));
        if event.is_terminal() {
            break;
        }
    }

    println!("{}", render::stage_board(run.session()));
    run.collect_output().await
}
