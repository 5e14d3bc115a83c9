//! # versification-mapper
//!
//! Moves verse references between Bible versifications, e.g. KJV `Ps.10.1`
//! to Synodal `Ps.9.22`, using `<Left>To<Right>.properties` mapping files.
//!
//! Mapping tables are built lazily, once, on first use, and are then shared
//! read-only across threads. When several entries compete for the same verse
//! the lowest target (chapter, then verse) wins, independently per direction.
//!
//! ```rust,no_run
//! use std::path::Path;
//! use std::sync::Arc;
//! use versification_mapper::{
//!     DiagnosticLogger, PropertiesFileSource, VersificationMapping, VersificationRegistry,
//! };
//!
//! let registry = VersificationRegistry::load(Path::new("versifications")).unwrap();
//! let source = Arc::new(PropertiesFileSource::new(Path::new("versificationmaps")));
//! let mapping = VersificationMapping::from_names(
//!     &registry,
//!     "KJV",
//!     "Synodal",
//!     source,
//!     DiagnosticLogger::in_memory(),
//! )
//! .unwrap();
//!
//! let kjv = registry.get("KJV").unwrap();
//! let synodal = registry.get("Synodal").unwrap();
//! let verse = versification_mapper::VerseReference::new("KJV", "Ps", 10, 1);
//! if mapping.can_convert(&kjv, &synodal) {
//!     println!("{}", mapping.translate(&verse, &synodal));
//! }
//! ```

pub mod converter;
pub mod logger;
pub mod mapping;
pub mod mapping_config;
pub mod mapping_source;
pub mod models;
pub mod reference;
pub mod schema;
pub mod verse_map;
pub mod versification;

pub use converter::VersificationConverter;
pub use logger::{DiagnosticLogger, MappingLoadSummary};
pub use mapping::VersificationMapping;
pub use mapping_config::MappingConfig;
pub use mapping_source::{MappingSource, PropertiesFileSource};
pub use models::{LoadStats, MappingRule, VerseReference};
pub use reference::ReferenceParser;
pub use verse_map::BidirectionalVerseMap;
pub use versification::{Versification, VersificationRegistry};
