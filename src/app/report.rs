use crate::args::OutputFormat;
use crate::error::AppResult;
use crate::measurement::RateUnitKind;
use crate::provider::SpeedReport;

/// Renders the final report for stdout.
///
/// # Errors
///
/// Returns an error when JSON serialization fails.
pub fn render_report(
    report: &SpeedReport,
    unit: RateUnitKind,
    format: OutputFormat,
) -> AppResult<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(report)?),
        OutputFormat::Text => Ok(text_lines(report, unit).join("\n")),
    }
}

fn text_lines(report: &SpeedReport, unit: RateUnitKind) -> Vec<String> {
    let mut lines = Vec::with_capacity(4);
    lines.push(format!("provider: {}", report.provider.as_str()));
    lines.push(format!("servers: {}", report.server_count));
    if let Some(download) = report.download {
        lines.push(format!("download: {}", download.display_in(unit)));
    }
    if let Some(upload) = report.upload {
        lines.push(format!("upload: {}", upload.display_in(unit)));
    }
    lines
}
