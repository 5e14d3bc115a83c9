use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// A single verse address within a named versification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct VerseReference {
    pub scheme: String,
    pub book: String, // OSIS id, e.g. Gen
    pub chapter: u32,
    pub verse: u32, // 0 marks the start of a chapter
}

impl VerseReference {
    pub fn new(scheme: &str, book: &str, chapter: u32, verse: u32) -> Self {
        VerseReference {
            scheme: scheme.to_string(),
            book: book.to_string(),
            chapter,
            verse,
        }
    }

    pub fn with_verse(&self, verse: u32) -> Self {
        VerseReference {
            verse,
            ..self.clone()
        }
    }

    /// Same address, relabelled into another versification.
    pub fn in_scheme(&self, scheme: &str) -> Self {
        VerseReference {
            scheme: scheme.to_string(),
            ..self.clone()
        }
    }

    /// Order used to pick between competing mapping targets: chapter, then
    /// verse, with the book id as a final tie key.
    pub fn mapping_cmp(&self, other: &VerseReference) -> Ordering {
        (self.chapter, self.verse, &self.book).cmp(&(other.chapter, other.verse, &other.book))
    }
}

impl fmt::Display for VerseReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.book, self.chapter, self.verse)
    }
}

/// Raw key/value pair from a mapping source, before tidying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub left: String,
    pub right: String,
}

impl MappingEntry {
    pub fn new(left: &str, right: &str) -> Self {
        MappingEntry {
            left: left.to_string(),
            right: right.to_string(),
        }
    }
}

/// Versification definition as stored in registry JSON files
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct VersificationData {
    pub name: String,
    pub books: Vec<BookDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BookDefinition {
    pub osis: String,
    pub name: String,
    /// Last verse number of each chapter, starting with chapter 1.
    pub last_verses: Vec<u32>,
}

impl BookDefinition {
    pub fn chapter_count(&self) -> u32 {
        self.last_verses.len() as u32
    }

    pub fn last_verse(&self, chapter: u32) -> Option<u32> {
        if chapter == 0 {
            return None;
        }
        self.last_verses.get(chapter as usize - 1).copied()
    }
}

/// Counters collected while building a mapping table.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct LoadStats {
    pub entries: usize,
    pub inserted: usize,
    pub skipped: usize,
}

/// Which step of the translation chain produced a result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MappingRule {
    Direct,
    VerseZero,
    Unmapped,
    SameVersification,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TranslationRecord {
    pub input: String,
    pub source: VerseReference,
    pub target: VerseReference,
    pub rule: MappingRule,
}

/// JSON output of the CLI
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TranslationReport {
    pub schema_version: String,
    pub mapping: String,
    pub from: String,
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_stats: Option<LoadStats>,
    pub translations: Vec<TranslationRecord>,
}
