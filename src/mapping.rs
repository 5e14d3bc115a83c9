use crate::logger::DiagnosticLogger;
use crate::mapping_source::{MappingSource, MAPPING_FILE_EXTENSION};
use crate::models::{LoadStats, MappingRule, VerseReference};
use crate::reference::{tidy_verse, ReferenceParser};
use crate::verse_map::BidirectionalVerseMap;
use crate::versification::{Versification, VersificationRegistry};
use anyhow::{Context, Result};
use std::fmt;
use std::sync::{Arc, OnceLock};

struct LoadedMapping {
    verse_map: BidirectionalVerseMap,
    stats: LoadStats,
}

/// Maps verses between two versifications using mapping data fetched from a
/// [`MappingSource`].
///
/// The mapping data is only loaded on the first translation. Concurrent first
/// callers wait for a single build; afterwards lookups take no lock.
pub struct VersificationMapping {
    left: Arc<Versification>,
    right: Arc<Versification>,
    source: Arc<dyn MappingSource>,
    parser: ReferenceParser,
    logger: DiagnosticLogger,
    loaded: OnceLock<LoadedMapping>,
}

impl VersificationMapping {
    pub fn new(
        left: Arc<Versification>,
        right: Arc<Versification>,
        source: Arc<dyn MappingSource>,
        logger: DiagnosticLogger,
    ) -> Result<Self> {
        Ok(VersificationMapping {
            left,
            right,
            source,
            parser: ReferenceParser::new()
                .context("Failed to create ReferenceParser for mapping")?,
            logger,
            loaded: OnceLock::new(),
        })
    }

    pub fn from_names(
        registry: &VersificationRegistry,
        left: &str,
        right: &str,
        source: Arc<dyn MappingSource>,
        logger: DiagnosticLogger,
    ) -> Result<Self> {
        let left = registry
            .get(left)
            .context("Failed to resolve left versification")?;
        let right = registry
            .get(right)
            .context("Failed to resolve right versification")?;
        Self::new(left, right, source, logger)
    }

    pub fn left(&self) -> &Arc<Versification> {
        &self.left
    }

    pub fn right(&self) -> &Arc<Versification> {
        &self.right
    }

    pub fn can_convert(&self, from: &Versification, to: &Versification) -> bool {
        self.covers(from.name(), to.name())
    }

    pub(crate) fn covers(&self, from: &str, to: &str) -> bool {
        let (left, right) = (self.left.name(), self.right.name());
        (from == left && to == right) || (from == right && to == left)
    }

    /// Translates `verse` into `to`.
    ///
    /// Callers must check [`can_convert`](Self::can_convert) first: any `to`
    /// other than the right-hand versification selects the backward table.
    pub fn translate(&self, verse: &VerseReference, to: &Versification) -> VerseReference {
        self.translate_with_rule(verse, to).0
    }

    /// Like [`translate`](Self::translate), but fails for a pair this mapping
    /// does not cover.
    pub fn try_translate(&self, verse: &VerseReference, to: &Versification) -> Result<VerseReference> {
        if !self.covers(&verse.scheme, to.name()) {
            return Err(anyhow::anyhow!(
                "Unsupported versification pair {} -> {} for {}",
                verse.scheme,
                to.name(),
                self
            ));
        }
        Ok(self.translate(verse, to))
    }

    pub fn translate_with_rule(
        &self,
        verse: &VerseReference,
        to: &Versification,
    ) -> (VerseReference, MappingRule) {
        let forward = *to == *self.right;

        if let Some(mapped) = self.lookup(verse, forward) {
            return (mapped.clone(), MappingRule::Direct);
        }

        // v0 is usually absent from mapping data; follow v1 so that the start
        // of a chapter lands in the same target chapter as its first verse
        if verse.verse == 0 {
            if let Some(mapped) = self.lookup(&verse.with_verse(1), forward) {
                return (mapped.with_verse(0), MappingRule::VerseZero);
            }
        }

        (verse.in_scheme(to.name()), MappingRule::Unmapped)
    }

    fn lookup(&self, verse: &VerseReference, forward: bool) -> Option<&VerseReference> {
        let verse_map = &self.loaded().verse_map;
        if forward {
            verse_map.lookup_forward(verse)
        } else {
            verse_map.lookup_backward(verse)
        }
    }

    fn loaded(&self) -> &LoadedMapping {
        self.loaded.get_or_init(|| self.load())
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.get().is_some()
    }

    pub fn load_stats(&self) -> Option<LoadStats> {
        self.loaded.get().map(|loaded| loaded.stats)
    }

    /// Name of the mapping data this instance reads, e.g. `KJVToSynodal.properties`.
    pub fn source_key(&self) -> String {
        format!(
            "{}To{}{}",
            self.left.name(),
            self.right.name(),
            MAPPING_FILE_EXTENSION
        )
    }

    fn load(&self) -> LoadedMapping {
        let key = self.source_key();
        self.logger.info(format!(
            "Loading {}<->{} mapping data from {}",
            self.left.name(),
            self.right.name(),
            key
        ));

        let mut verse_map = BidirectionalVerseMap::new();
        let mut stats = LoadStats::default();

        let entries = match self.source.entries(&key) {
            Ok(entries) => entries,
            Err(e) => {
                self.logger.error(
                    format!("Failed to load mapping data {}: {:#}", key, e),
                    Some(serde_json::json!({ "mapping": self.to_string(), "key": key })),
                );
                return LoadedMapping { verse_map, stats };
            }
        };

        stats.entries = entries.len();

        for entry in &entries {
            let parsed = self
                .parser
                .parse(&self.left, tidy_verse(&entry.left))
                .and_then(|left| {
                    let right = self.parser.parse(&self.right, tidy_verse(&entry.right))?;
                    Ok((left, right))
                });

            match parsed {
                Ok((left, right)) => {
                    verse_map.insert_prefer_lowest(left, right);
                    stats.inserted += 1;
                }
                Err(e) => {
                    stats.skipped += 1;
                    self.logger.error(
                        format!("Bad verse in mapping data: {}", e),
                        Some(serde_json::json!({
                            "mapping": self.to_string(),
                            "left": entry.left,
                            "right": entry.right,
                        })),
                    );
                }
            }
        }

        self.logger.info(format!(
            "Loaded {}: {} entries, {} mapped, {} skipped ({} forward, {} backward rules)",
            self,
            stats.entries,
            stats.inserted,
            stats.skipped,
            verse_map.len(),
            verse_map.backward_len()
        ));

        LoadedMapping { verse_map, stats }
    }
}

impl fmt::Display for VersificationMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}Mapping", self.left.name(), self.right.name())
    }
}

impl fmt::Debug for VersificationMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VersificationMapping")
            .field("left", &self.left.name())
            .field("right", &self.right.name())
            .field("loaded", &self.is_loaded())
            .finish()
    }
}
