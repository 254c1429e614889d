use std::path::Path;

use chrono::Utc;
use daybook_core::export::{
    render_entries_export, suggested_export_file_name, ExportFormat as EntryExportFormat,
};

use crate::cli::ExportFormat;
use crate::commands::common::connect;
use crate::error::CliError;

pub async fn run_export(
    format: ExportFormat,
    output_path: Option<&Path>,
    global_profile: Option<&str>,
) -> Result<(), CliError> {
    let backend = connect(global_profile).await?;
    let entries = backend.timeline().await?;
    let format = export_format(format);
    let rendered = render_entries_export(&entries, format)?;
    tracing::info!("Exporting {} entries", entries.len());

    if let Some(path) = output_path {
        let path = if path.is_dir() {
            path.join(suggested_export_file_name(
                format,
                Utc::now().timestamp_millis(),
            ))
        } else {
            path.to_path_buf()
        };
        std::fs::write(&path, rendered)?;
        println!("{}", path.display());
    } else {
        println!("{rendered}");
    }

    Ok(())
}

pub const fn export_format(format: ExportFormat) -> EntryExportFormat {
    match format {
        ExportFormat::Json => EntryExportFormat::Json,
        ExportFormat::Markdown => EntryExportFormat::Markdown,
    }
}
