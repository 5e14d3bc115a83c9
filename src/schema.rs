use crate::models::*;
use schemars::schema_for;
use std::fs;
use std::path::Path;

/// Generate all JSON schemas
pub fn generate_schemas(schema_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    fs::create_dir_all(schema_dir)?;

    let report_schema = schema_for!(TranslationReport);
    let report_json = serde_json::to_string_pretty(&report_schema)?;
    fs::write(schema_dir.join("translation-report-1.0.json"), report_json)?;

    let versification_schema = schema_for!(VersificationData);
    let versification_json = serde_json::to_string_pretty(&versification_schema)?;
    fs::write(schema_dir.join("versification-1.0.json"), versification_json)?;

    Ok(())
}
