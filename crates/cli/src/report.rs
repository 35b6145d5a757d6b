use crate::collection::BatchSummary;
use anyhow::Result;
use std::io::{self, Write};

/// Write a line to stdout, treating a closed pipe as success
pub fn print_stdout(text: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    if let Err(err) = stdout
        .write_all(text.as_bytes())
        .and_then(|_| stdout.write_all(b"\n"))
        .and_then(|_| stdout.flush())
    {
        if err.kind() == io::ErrorKind::BrokenPipe {
            return Ok(());
        }
        return Err(err.into());
    }
    Ok(())
}

pub fn render_summary(summary: &BatchSummary) -> String {
    let mut line = format!(
        "Chunked {}/{} documents into {} chunks",
        summary.chunked, summary.documents, summary.total_chunks
    );
    if summary.failed > 0 || summary.skipped > 0 {
        line.push_str(&format!(
            " ({} failed, {} skipped)",
            summary.failed, summary.skipped
        ));
    }
    line
}
