use datavex_client::prelude::*;
use datavex_client::init_observability;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), ClientError> {
    init_observability();

    let client = PipelineClient::new(ClientConfig::from_env())?;
    let mut run = client.start("data observability").await?;

    while let Some(event) = run.next_event().await? {
        let session = run.session();
        println!("{:>3}% {}", session.progress_percent(), session.label());
        if event.is_terminal() {
            break;
        }
    }

    match run.collect_output().await {
        Ok(output) => println!(
            "done in {}s: {}",
            output.run_metadata.total_pipeline_duration_seconds, output.blog.meta_title
        ),
        Err(err) => eprintln!("run failed: {err}"),
    }
    Ok(())
}
