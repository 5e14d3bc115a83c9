mod cli;

use crate::cli::Cli;
use versification_mapper::mapping_source::MAPPING_FILE_EXTENSION;
use versification_mapper::models::{TranslationRecord, TranslationReport};
use versification_mapper::schema;
use versification_mapper::{
    DiagnosticLogger, MappingConfig, MappingLoadSummary, MappingRule, PropertiesFileSource,
    ReferenceParser, VersificationConverter, VersificationMapping, VersificationRegistry,
};
use anyhow::{Context, Result};
use std::sync::Arc;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = MappingConfig::new(
        cli.maps_dir.clone(),
        cli.registry.clone(),
        cli.log_dir.clone(),
        cli.max_log_builds,
    );

    if let Some(schema_dir) = &cli.schema_out {
        schema::generate_schemas(schema_dir)
            .map_err(|e| anyhow::anyhow!("Schema generation failed: {}", e))?;
        println!("Schemas written to {:?}", schema_dir);
        return Ok(());
    }

    let source = Arc::new(PropertiesFileSource::new(&config.maps_dir));

    if cli.list {
        for key in source.available_keys()? {
            let checksum = source
                .checksum(&key)
                .with_context(|| format!("Failed to checksum {}", key))?;
            println!("{}  {}", checksum, key);
        }
        return Ok(());
    }

    let from = cli.from.as_deref().context("--from is required")?;
    let to = cli.to.as_deref().context("--to is required")?;
    if cli.references.is_empty() {
        return Err(anyhow::anyhow!("No references given"));
    }

    let logger = DiagnosticLogger::new(&config.log_dir)
        .context("Failed to create DiagnosticLogger")?;
    let registry = VersificationRegistry::load(&config.registry_path)
        .with_context(|| format!("Failed to load versifications from {:?}", config.registry_path))?;

    let from_scheme = registry.get(from)?;
    let to_scheme = registry.get(to)?;
    let converter = load_converter(&registry, &source, logger.clone())?;
    if !converter.can_convert(&from_scheme, &to_scheme) {
        return Err(anyhow::anyhow!(
            "No mapping data for {} <-> {} in {:?} (known versifications: {})",
            from,
            to,
            config.maps_dir,
            registry.names().join(", ")
        ));
    }
    let parser = ReferenceParser::new().context("Failed to create ReferenceParser")?;

    let mut translations = Vec::new();
    for input in &cli.references {
        let verse = parser
            .parse(&from_scheme, input)
            .with_context(|| format!("Invalid {} reference: {}", from, input))?;
        let (target, rule) = converter.convert_with_rule(&verse, &to_scheme);
        translations.push(TranslationRecord {
            input: input.clone(),
            source: verse,
            target,
            rule,
        });
    }

    let mapping = converter.find(from, to);
    let report = TranslationReport {
        schema_version: "1.0".to_string(),
        mapping: mapping
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("{}Identity", from)),
        from: from.to_string(),
        to: to.to_string(),
        load_stats: mapping.and_then(|m| m.load_stats()),
        translations,
    };

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    } else {
        for record in &report.translations {
            println!(
                "{} ({}) -> {} ({}) [{}]",
                record.source,
                record.source.scheme,
                record.target,
                record.target.scheme,
                rule_label(record.rule)
            );
        }
    }

    let loaded: Vec<MappingLoadSummary> = converter
        .mappings()
        .iter()
        .filter_map(|m| {
            m.load_stats().map(|stats| MappingLoadSummary {
                mapping: m.to_string(),
                stats,
            })
        })
        .collect();
    let diagnostics = logger.generate_report(loaded)?;
    eprintln!(
        "Errors: {}, Warnings: {}",
        diagnostics.summary.errors, diagnostics.summary.warnings
    );

    logger.rotate_logs(config.max_log_builds)?;

    Ok(())
}

/// Registers a lazily loaded mapping for every mapping file whose two
/// versifications are known to the registry.
fn load_converter(
    registry: &VersificationRegistry,
    source: &Arc<PropertiesFileSource>,
    logger: DiagnosticLogger,
) -> Result<VersificationConverter> {
    let keys = source.available_keys()?;
    let names = registry.names();
    let mut converter = VersificationConverter::new();

    for left in &names {
        for right in &names {
            if left == right {
                continue;
            }
            let key = format!("{}To{}{}", left, right, MAPPING_FILE_EXTENSION);
            if keys.contains(&key) {
                let mapping = VersificationMapping::from_names(
                    registry,
                    left,
                    right,
                    source.clone(),
                    logger.clone(),
                )
                .with_context(|| format!("Failed to create mapping for {}", key))?;
                converter.add(Arc::new(mapping));
            }
        }
    }

    Ok(converter)
}

fn rule_label(rule: MappingRule) -> &'static str {
    match rule {
        MappingRule::Direct => "mapped",
        MappingRule::VerseZero => "mapped via verse 1",
        MappingRule::Unmapped => "unmapped",
        MappingRule::SameVersification => "same versification",
    }
}
