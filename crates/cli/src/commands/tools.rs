//! External tool availability.

use anyhow::Result;
use serde::Serialize;

use unifile_core::ProbeStatus;

use crate::app::App;
use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize)]
struct ToolRow {
    id: String,
    name: String,
    program: String,
    #[serde(flatten)]
    status: ProbeStatus,
}

/// Execute the tools command
pub async fn execute(app: &App, format: OutputFormat) -> Result<()> {
    let results = app.probes.probe_all(&app.registry).await;

    let rows: Vec<ToolRow> = app
        .registry
        .adapters()
        .iter()
        .zip(results)
        .map(|(adapter, (_, status))| ToolRow {
            id: adapter.id().to_string(),
            name: adapter.display_name().to_string(),
            program: adapter.program().display().to_string(),
            status,
        })
        .collect();

    match format {
        OutputFormat::Json => output::print_json(&rows),
        OutputFormat::Text => {
            for row in &rows {
                let line = format!("{:<12} {}", row.name, row.status);
                if row.status.is_available() {
                    output::print_success(&line);
                } else {
                    output::print_warning(&line);
                }
            }
            let available = rows.iter().filter(|r| r.status.is_available()).count();
            println!("\n{}/{} tools available", available, rows.len());
        }
    }
    Ok(())
}
