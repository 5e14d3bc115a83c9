use crate::mapping::VersificationMapping;
use crate::models::{MappingRule, VerseReference};
use crate::versification::Versification;
use std::sync::Arc;

/// Picks the mapping able to move a verse between two versifications.
#[derive(Debug, Default)]
pub struct VersificationConverter {
    mappings: Vec<Arc<VersificationMapping>>,
}

impl VersificationConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mapping: Arc<VersificationMapping>) {
        self.mappings.push(mapping);
    }

    pub fn mappings(&self) -> &[Arc<VersificationMapping>] {
        &self.mappings
    }

    pub fn can_convert(&self, from: &Versification, to: &Versification) -> bool {
        from == to || self.find(from.name(), to.name()).is_some()
    }

    /// Converts `verse` into `to`. Without a covering mapping the verse keeps
    /// its address and is relabelled.
    pub fn convert(&self, verse: &VerseReference, to: &Versification) -> VerseReference {
        self.convert_with_rule(verse, to).0
    }

    pub fn convert_with_rule(
        &self,
        verse: &VerseReference,
        to: &Versification,
    ) -> (VerseReference, MappingRule) {
        if verse.scheme == to.name() {
            return (verse.clone(), MappingRule::SameVersification);
        }

        match self.find(&verse.scheme, to.name()) {
            Some(mapping) => mapping.translate_with_rule(verse, to),
            None => (verse.in_scheme(to.name()), MappingRule::Unmapped),
        }
    }

    /// The mapping covering `from` and `to` in either order.
    pub fn find(&self, from: &str, to: &str) -> Option<&Arc<VersificationMapping>> {
        self.mappings.iter().find(|m| m.covers(from, to))
    }
}
