use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::config::ReportFormat;
use crate::error::{Result, SuiteLensError};
use crate::suite::Suite;

use super::report::render_text;

/// Writes the combined report for `suites` to `output`.
///
/// Supported formats:
/// - Text: the human-readable suite/spec layout
/// - JSON: the decoded suites re-serialized, for programmatic access
pub fn export_report(
    suites: &[Suite],
    format: ReportFormat,
    pretty: bool,
    output: &mut dyn Write,
) -> io::Result<()> {
    match format {
        ReportFormat::Text => render_text(suites, output),
        ReportFormat::Json => export_json(suites, pretty, output),
    }
}

fn export_json(suites: &[Suite], pretty: bool, output: &mut dyn Write) -> io::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *output, suites)?;
    } else {
        serde_json::to_writer(&mut *output, suites)?;
    }
    writeln!(output)
}

/// Creates (or truncates) `path` and writes the report into it.
///
/// # Errors
///
/// Any failure to create, write or flush the file is returned as
/// [`SuiteLensError::Render`].
pub fn write_report(suites: &[Suite], format: ReportFormat, pretty: bool, path: &Path) -> Result<()> {
    let render_error = |source: io::Error| SuiteLensError::Render {
        path: path.display().to_string(),
        source,
    };

    let file = File::create(path).map_err(render_error)?;
    let mut writer = BufWriter::new(file);
    export_report(suites, format, pretty, &mut writer).map_err(render_error)?;
    writer.flush().map_err(render_error)
}
