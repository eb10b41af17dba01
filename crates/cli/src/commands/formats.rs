//! Supported formats and conversions.

use anyhow::Result;
use serde::Serialize;

use unifile_core::{format::formats_in, Category};

use crate::app::App;
use crate::output::{self, OutputFormat};

#[derive(Debug, Serialize)]
struct CategoryRow {
    category: Category,
    extensions: Vec<&'static str>,
    converts_to: Vec<Category>,
}

/// Execute the formats command
pub fn execute(app: &App, format: OutputFormat) -> Result<()> {
    let rows: Vec<CategoryRow> = Category::ALL
        .into_iter()
        .map(|category| CategoryRow {
            category,
            extensions: formats_in(category).iter().map(|f| f.extension).collect(),
            converts_to: app.registry.target_categories(category).into_iter().collect(),
        })
        .collect();

    match format {
        OutputFormat::Json => output::print_json(&rows),
        OutputFormat::Text => {
            for row in &rows {
                println!("{}", row.category);
                output::print_kv("Extensions", &row.extensions.join(", "));
                let targets = if row.converts_to.is_empty() {
                    "(no backend)".to_string()
                } else {
                    row.converts_to
                        .iter()
                        .map(Category::to_string)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                output::print_kv("Converts to", &targets);
            }
        }
    }
    Ok(())
}
