use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::info;

use crate::error::ExportError;
use crate::output::PipelineOutput;

/// Writes `output` as pretty-printed JSON into `dir` and returns the path.
///
/// The file name follows `datavex-pipeline-{keyword}-{millis}.json`, with
/// whitespace runs in the keyword collapsed to `-`. The payload is written
/// verbatim from the terminal `result` event; nothing is rewritten.
pub fn export_output(output: &PipelineOutput, dir: impl AsRef<Path>) -> Result<PathBuf, ExportError> {
    let dir = dir.as_ref();
    std::fs::create_dir_all(dir)?;

    let path = dir.join(export_file_name(&output.run_metadata.keyword, unix_millis()));
    let json = serde_json::to_string_pretty(output)?;
    std::fs::write(&path, json)?;
    info!(path = %path.display(), "exported pipeline output");
    Ok(path)
}

fn export_file_name(keyword: &str, millis: u128) -> String {
    let slug = keyword.split_whitespace().collect::<Vec<_>>().join("-");
    format!("datavex-pipeline-{slug}-{millis}.json")
}

fn unix_millis() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::fixtures::sample_output;

    #[test]
    fn file_name_collapses_whitespace_runs() {
        let name = export_file_name("data  observability\ttools", 1_756_000_000_000);
        assert_eq!(
            name,
            "datavex-pipeline-data-observability-tools-1756000000000.json"
        );
    }

    #[test]
    fn export_writes_pretty_json_that_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let output = sample_output();

        let path = export_output(&output, dir.path()).expect("export");
        assert!(path.starts_with(dir.path()));
        assert!(
            path.file_name()
                .and_then(|n| n.to_str())
                .expect("file name")
                .starts_with("datavex-pipeline-data-observability-")
        );

        let written = std::fs::read_to_string(&path).expect("read back");
        assert!(written.contains('\n'), "expected pretty-printed JSON");
        let back: PipelineOutput = serde_json::from_str(&written).expect("parse");
        assert_eq!(back, output);
    }

    #[test]
    fn export_creates_missing_directories() {
        let dir = tempfile::tempdir().expect("tempdir");
        let nested = dir.path().join("exports").join("runs");
        let path = export_output(&sample_output(), &nested).expect("export");
        assert!(path.starts_with(&nested));
        assert!(path.exists());
    }
}
