use anyhow::Result;
use chrono::Utc;
use csv::Writer;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::record::{EntityKind, UrnRecord};

/// Fixed CSV column order.
const CSV_HEADER: [&str; 4] = ["input_url", "entity_type", "urn", "entity_id"];

fn ensure_parent_dir(output_path: &str) -> Result<()> {
    if let Some(parent) = Path::new(output_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    Ok(())
}

pub fn export_csv(records: &[UrnRecord], output_path: &str) -> Result<()> {
    debug!("Exporting {} records to CSV: {}", records.len(), output_path);

    ensure_parent_dir(output_path)?;
    let file = File::create(output_path)?;
    let mut wtr = Writer::from_writer(file);

    wtr.write_record(CSV_HEADER)?;

    for record in records {
        wtr.write_record(&[
            &record.input_url,
            &record.entity_type.to_string(),
            &record.urn,
            &record.entity_id,
        ])?;
    }

    wtr.flush()?;
    info!("Successfully exported {} records to CSV: {}", records.len(), output_path);

    Ok(())
}

pub fn export_json(records: &[UrnRecord], output_path: &str) -> Result<()> {
    debug!("Exporting {} records to JSON: {}", records.len(), output_path);

    let json_output = JsonExport {
        summary: ExportSummary {
            total_records: records.len(),
            companies: records
                .iter()
                .filter(|r| r.entity_type == EntityKind::Company)
                .count(),
            people: records
                .iter()
                .filter(|r| r.entity_type == EntityKind::Person)
                .count(),
            generated_at: Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string(),
        },
        records: records.to_vec(),
    };

    let json_string = serde_json::to_string_pretty(&json_output)?;

    ensure_parent_dir(output_path)?;
    let mut file = File::create(output_path)?;
    file.write_all(json_string.as_bytes())?;

    info!("Successfully exported {} records to JSON: {}", records.len(), output_path);

    Ok(())
}

#[derive(serde::Serialize)]
struct JsonExport {
    summary: ExportSummary,
    records: Vec<UrnRecord>,
}

#[derive(serde::Serialize)]
struct ExportSummary {
    total_records: usize,
    companies: usize,
    people: usize,
    generated_at: String,
}
