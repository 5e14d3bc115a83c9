use crate::models::LoadStats;
use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use walkdir::WalkDir;

const BUILD_LOG_PREFIX: &str = "build-";
const BUILD_LOG_SUFFIX: &str = ".jsonl";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogLevel {
    #[serde(rename = "info")]
    Info,
    #[serde(rename = "warning")]
    Warning,
    #[serde(rename = "error")]
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
    pub context: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiagnosticReport {
    pub build_id: String,
    pub timestamp: String,
    pub summary: ReportSummary,
    pub entries: Vec<LogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummary {
    pub errors: usize,
    pub warnings: usize,
    pub mappings: Vec<MappingLoadSummary>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingLoadSummary {
    pub mapping: String,
    pub stats: LoadStats,
}

/// Structured JSONL diagnostics, shared by clone across threads.
#[derive(Clone)]
pub struct DiagnosticLogger {
    log_dir: Option<PathBuf>,
    log_file: Arc<Mutex<Option<BufWriter<File>>>>,
    build_id: String,
    entries: Arc<Mutex<Vec<LogEntry>>>,
    error_count: Arc<Mutex<usize>>,
    warning_count: Arc<Mutex<usize>>,
}

impl DiagnosticLogger {
    pub fn new(log_dir: &Path) -> Result<Self> {
        fs::create_dir_all(log_dir)
            .with_context(|| format!("Failed to create log directory: {:?}", log_dir))?;

        let build_id = Utc::now().format("%Y%m%d-%H%M%S").to_string();
        let log_file_path = log_dir.join(build_log_name(&build_id));

        let log_file = Some(BufWriter::new(
            File::create(&log_file_path)
                .with_context(|| format!("Failed to create log file: {:?}", log_file_path))?,
        ));

        Ok(DiagnosticLogger {
            log_dir: Some(log_dir.to_path_buf()),
            log_file: Arc::new(Mutex::new(log_file)),
            build_id,
            entries: Arc::new(Mutex::new(Vec::new())),
            error_count: Arc::new(Mutex::new(0)),
            warning_count: Arc::new(Mutex::new(0)),
        })
    }

    /// Logger that keeps entries in memory only.
    pub fn in_memory() -> Self {
        DiagnosticLogger {
            log_dir: None,
            log_file: Arc::new(Mutex::new(None)),
            build_id: Utc::now().format("%Y%m%d-%H%M%S").to_string(),
            entries: Arc::new(Mutex::new(Vec::new())),
            error_count: Arc::new(Mutex::new(0)),
            warning_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn log(&self, level: LogLevel, message: String, context: Option<serde_json::Value>) {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            level: level.clone(),
            message,
            context,
        };

        match level {
            LogLevel::Error => {
                if let Ok(mut count) = self.error_count.lock() {
                    *count += 1;
                }
            }
            LogLevel::Warning => {
                if let Ok(mut count) = self.warning_count.lock() {
                    *count += 1;
                }
            }
            _ => {}
        }

        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                if let Ok(json) = serde_json::to_string(&entry) {
                    let _ = writeln!(file, "{}", json);
                }
            }
        }

        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }

    pub fn info(&self, message: String) {
        self.log(LogLevel::Info, message, None);
    }

    pub fn warning(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Warning, message, context);
    }

    pub fn error(&self, message: String, context: Option<serde_json::Value>) {
        self.log(LogLevel::Error, message, context);
    }

    pub fn error_count(&self) -> usize {
        self.error_count.lock().map(|c| *c).unwrap_or(0)
    }

    pub fn warning_count(&self) -> usize {
        self.warning_count.lock().map(|c| *c).unwrap_or(0)
    }

    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn generate_report(&self, mappings: Vec<MappingLoadSummary>) -> Result<DiagnosticReport> {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                file.flush()
                    .context("Failed to flush log file before generating report")?;
            }
        }

        Ok(DiagnosticReport {
            build_id: self.build_id.clone(),
            timestamp: Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true),
            summary: ReportSummary {
                errors: self.error_count(),
                warnings: self.warning_count(),
                mappings,
            },
            entries: self.entries(),
        })
    }

    /// Deletes all but the newest `max_builds` build logs. Build ids sort by
    /// time, and the log of the current build is always kept.
    pub fn rotate_logs(&self, max_builds: usize) -> Result<()> {
        let Some(log_dir) = &self.log_dir else {
            return Ok(());
        };

        let current = build_log_name(&self.build_id);
        let mut older: Vec<(String, PathBuf)> = WalkDir::new(log_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| {
                let name = e.file_name().to_str()?.to_string();
                let is_build_log = name.starts_with(BUILD_LOG_PREFIX)
                    && name.ends_with(BUILD_LOG_SUFFIX)
                    && name != current;
                is_build_log.then(|| (name, e.into_path()))
            })
            .collect();

        // newest first
        older.sort_by(|a, b| b.0.cmp(&a.0));
        let keep = max_builds.saturating_sub(1);

        for (_, path) in older.iter().skip(keep) {
            fs::remove_file(path)
                .with_context(|| format!("Failed to delete old build log: {:?}", path))?;
        }

        Ok(())
    }

    pub fn build_id(&self) -> &str {
        &self.build_id
    }
}

fn build_log_name(build_id: &str) -> String {
    format!("{}{}{}", BUILD_LOG_PREFIX, build_id, BUILD_LOG_SUFFIX)
}

impl Drop for DiagnosticLogger {
    fn drop(&mut self) {
        if let Ok(mut file_opt) = self.log_file.lock() {
            if let Some(ref mut file) = *file_opt {
                let _ = file.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_logger_creation() {
        let temp_dir = TempDir::new().unwrap();
        let logger = DiagnosticLogger::new(temp_dir.path()).unwrap();
        assert!(!logger.build_id().is_empty());
    }

    #[test]
    fn test_logging_levels() {
        let logger = DiagnosticLogger::in_memory();

        logger.info("Test info message".to_string());
        logger.warning("Test warning".to_string(), None);
        logger.error("Test error".to_string(), None);

        assert_eq!(logger.error_count(), 1);
        assert_eq!(logger.warning_count(), 1);
        assert_eq!(logger.entries().len(), 3);
    }

    #[test]
    fn test_entries_written_as_jsonl() {
        let temp_dir = TempDir::new().unwrap();
        let logger = DiagnosticLogger::new(temp_dir.path()).unwrap();

        logger.error(
            "Bad verse in mapping data".to_string(),
            Some(serde_json::json!({ "left": "Gen.99.1", "right": "Gen.1.1" })),
        );
        logger.generate_report(Vec::new()).unwrap();

        let path = temp_dir.path().join(build_log_name(logger.build_id()));
        let content = fs::read_to_string(path).unwrap();
        let line: serde_json::Value = serde_json::from_str(content.lines().next().unwrap()).unwrap();
        assert_eq!(line["level"], "error");
        assert_eq!(line["context"]["left"], "Gen.99.1");
    }

    fn build_logs(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|name| name.starts_with(BUILD_LOG_PREFIX))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_log_rotation_keeps_newest_builds() {
        let temp_dir = TempDir::new().unwrap();
        let logger = DiagnosticLogger::new(temp_dir.path()).unwrap();

        for i in 0..15 {
            let name = build_log_name(&format!("20200101-0000{:02}", i));
            File::create(temp_dir.path().join(name)).unwrap();
        }
        fs::write(temp_dir.path().join("notes.txt"), "kept").unwrap();

        logger.rotate_logs(3).unwrap();

        let mut expected = vec![
            build_log_name("20200101-000013"),
            build_log_name("20200101-000014"),
            build_log_name(logger.build_id()),
        ];
        expected.sort();
        assert_eq!(build_logs(temp_dir.path()), expected);
        assert!(temp_dir.path().join("notes.txt").exists());
    }

    #[test]
    fn test_log_rotation_never_deletes_current_build() {
        let temp_dir = TempDir::new().unwrap();
        let logger = DiagnosticLogger::new(temp_dir.path()).unwrap();
        File::create(temp_dir.path().join(build_log_name("20200101-000000"))).unwrap();

        logger.rotate_logs(0).unwrap();

        assert_eq!(
            build_logs(temp_dir.path()),
            vec![build_log_name(logger.build_id())]
        );
    }

    #[test]
    fn test_in_memory_rotation_is_noop() {
        let logger = DiagnosticLogger::in_memory();
        assert!(logger.rotate_logs(0).is_ok());
    }

    #[test]
    fn test_generate_report() {
        let logger = DiagnosticLogger::in_memory();

        logger.info("Info message".to_string());
        logger.warning("Warning message".to_string(), None);
        logger.error("Error message".to_string(), None);

        let report = logger
            .generate_report(vec![MappingLoadSummary {
                mapping: "KJVSynodalMapping".to_string(),
                stats: LoadStats {
                    entries: 10,
                    inserted: 9,
                    skipped: 1,
                },
            }])
            .unwrap();

        assert_eq!(report.summary.errors, 1);
        assert_eq!(report.summary.warnings, 1);
        assert_eq!(report.summary.mappings[0].stats.skipped, 1);
        assert_eq!(report.entries.len(), 3);
    }
}
