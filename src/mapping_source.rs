use crate::models::MappingEntry;
use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub const MAPPING_FILE_EXTENSION: &str = ".properties";
const GZIP_SUFFIX: &str = ".gz";

/// Supplies the raw key/value lines of a named mapping, e.g.
/// `KJVToSynodal.properties`. Entry order carries no meaning.
pub trait MappingSource: Send + Sync {
    fn entries(&self, key: &str) -> Result<Vec<MappingEntry>>;
}

/// Reads the subset of the Java properties format used by mapping files.
///
/// The key ends at the first `=`, `:` or whitespace. Whitespace around the
/// separator is dropped, so `Gen.3.16=Exod.4.16`, `Gen.3.16 : Exod.4.16` and
/// `Gen.3.16 Exod.4.16` all read the same. Escapes and line continuations
/// are not supported.
pub fn parse_properties(text: &str) -> Vec<MappingEntry> {
    let mut entries = Vec::new();

    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with('!') {
            continue;
        }

        let entry = match line.find(|c: char| is_separator(c) || c.is_whitespace()) {
            Some(idx) => {
                let rest = line[idx..].trim_start();
                let value = rest.strip_prefix(is_separator).unwrap_or(rest);
                MappingEntry::new(&line[..idx], value.trim())
            }
            None => MappingEntry::new(line, ""),
        };
        entries.push(entry);
    }

    entries
}

fn is_separator(c: char) -> bool {
    c == '=' || c == ':'
}

/// Mapping files stored in one directory, optionally gzip compressed.
pub struct PropertiesFileSource {
    maps_dir: PathBuf,
}

impl PropertiesFileSource {
    pub fn new(maps_dir: &Path) -> Self {
        PropertiesFileSource {
            maps_dir: maps_dir.to_path_buf(),
        }
    }

    fn resolve(&self, key: &str) -> Result<PathBuf> {
        let plain = self.maps_dir.join(key);
        if plain.is_file() {
            return Ok(plain);
        }
        let compressed = self.maps_dir.join(format!("{}{}", key, GZIP_SUFFIX));
        if compressed.is_file() {
            return Ok(compressed);
        }
        Err(anyhow::anyhow!(
            "Mapping file {} not found in {:?}",
            key,
            self.maps_dir
        ))
    }

    fn read_bytes(&self, key: &str) -> Result<(PathBuf, Vec<u8>)> {
        let path = self.resolve(key)?;
        let bytes = fs::read(&path)
            .with_context(|| format!("Failed to read mapping file: {:?}", path))?;
        Ok((path, bytes))
    }

    /// SHA-256 of the mapping file as stored on disk.
    pub fn checksum(&self, key: &str) -> Result<String> {
        let (_, bytes) = self.read_bytes(key)?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Keys of every mapping file in the directory, sorted.
    pub fn available_keys(&self) -> Result<Vec<String>> {
        if !self.maps_dir.is_dir() {
            return Err(anyhow::anyhow!(
                "Mapping directory not found: {:?}",
                self.maps_dir
            ));
        }

        let mut keys: Vec<String> = WalkDir::new(&self.maps_dir)
            .max_depth(1)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter_map(|e| e.file_name().to_str().map(|s| s.to_string()))
            .filter_map(|name| {
                let key = name.strip_suffix(GZIP_SUFFIX).unwrap_or(name.as_str());
                key.ends_with(MAPPING_FILE_EXTENSION).then(|| key.to_string())
            })
            .collect();
        keys.sort();
        keys.dedup();

        Ok(keys)
    }
}

impl MappingSource for PropertiesFileSource {
    fn entries(&self, key: &str) -> Result<Vec<MappingEntry>> {
        let (path, bytes) = self.read_bytes(key)?;

        let text = if path.to_string_lossy().ends_with(GZIP_SUFFIX) {
            let mut decoded = String::new();
            GzDecoder::new(bytes.as_slice())
                .read_to_string(&mut decoded)
                .with_context(|| format!("Failed to decompress mapping file: {:?}", path))?;
            decoded
        } else {
            String::from_utf8(bytes)
                .with_context(|| format!("Mapping file is not UTF-8: {:?}", path))?
        };

        Ok(parse_properties(&text))
    }
}
