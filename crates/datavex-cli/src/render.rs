use datavex_client::prelude::*;

/// Formats the full stage board, one line per stage, plus the progress line.
pub fn stage_board(session: &RunSession) -> String {
    let mut out = String::new();
    for stage in session.stages() {
        let marker = if stage.active {
            '>'
        } else if stage.completed {
            'x'
        } else {
            ' '
        };
        out.push('[');
        out.push(marker);
        out.push_str("] ");
        out.push_str(&stage.label);
        out.push('\n');
    }
    out.push_str(&progress_line(session));
    out
}

/// Formats the single-line progress view shown after each event.
pub fn progress_line(session: &RunSession) -> String {
    format!("{:>3}% {}", session.progress_percent(), session.label())
}

/// Formats the result summary printed after a successful run.
pub fn summary(output: &PipelineOutput) -> String {
    let mut out = format!(
        "completed in {}s\nblog: {}\ntweets: {}\n",
        output.run_metadata.total_pipeline_duration_seconds,
        output.blog.meta_title,
        output.twitter_thread.tweets.len(),
    );
    if !output.quality_gate_log.is_empty() {
        out.push_str("gates:\n");
        for gate in &output.quality_gate_log {
            let verdict = if gate.gate_passed { "pass" } else { "fail" };
            out.push_str(&format!(
                "  {}: {} ({})\n",
                gate.asset, verdict, gate.trigger_reason
            ));
        }
    }
    out
}
