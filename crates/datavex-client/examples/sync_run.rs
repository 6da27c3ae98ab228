use datavex_client::prelude::*;
use datavex_client::{export_output, init_observability};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_observability();

    let client = PipelineClient::new(ClientConfig::from_env())?;
    let output = client.run_sync("data observability").await?;

    println!(
        "pipeline finished in {}s",
        output.run_metadata.total_pipeline_duration_seconds
    );
    let path = export_output(&output, "./out")?;
    println!("exported to {}", path.display());
    Ok(())
}
