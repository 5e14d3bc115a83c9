use crate::models::VerseReference;
use crate::versification::Versification;
use anyhow::{Context, Result};
use regex::Regex;

/// Strips one trailing disambiguation letter (`a` to `e`), so that `Gen.3.16a`
/// and `Gen.3.16b` both become `Gen.3.16`.
pub fn tidy_verse(text: &str) -> &str {
    let trimmed = text.trim();
    match trimmed.chars().last() {
        Some('a'..='e') => &trimmed[..trimmed.len() - 1],
        _ => trimmed,
    }
}

/// Parses `Book.C.V`, `Book C:V` or `Book C.V` into a reference in a given
/// versification.
pub struct ReferenceParser {
    reference_pattern: Regex,
}

impl ReferenceParser {
    pub fn new() -> Result<Self> {
        Ok(ReferenceParser {
            reference_pattern: Regex::new(
                r"^([1-4]?\s*[A-Za-z][A-Za-z ]*?)\s*[.\s]\s*(\d+)\s*[.:]\s*(\d+)$",
            )
            .context("Failed to compile reference pattern")?,
        })
    }

    pub fn parse(&self, scheme: &Versification, text: &str) -> Result<VerseReference> {
        let trimmed = text.trim();
        let captures = self
            .reference_pattern
            .captures(trimmed)
            .ok_or_else(|| anyhow::anyhow!("No such verse: cannot read '{}'", trimmed))?;

        let book_name = captures
            .get(1)
            .context("Book not found in pattern")?
            .as_str();
        let chapter = captures
            .get(2)
            .context("Chapter not found in pattern")?
            .as_str()
            .parse::<u32>()
            .with_context(|| format!("Invalid chapter number in: {}", trimmed))?;
        let verse = captures
            .get(3)
            .context("Verse not found in pattern")?
            .as_str()
            .parse::<u32>()
            .with_context(|| format!("Invalid verse number in: {}", trimmed))?;

        let book = scheme.resolve_book(book_name).ok_or_else(|| {
            anyhow::anyhow!("No such verse: unknown book '{}' in {}", book_name, scheme.name())
        })?;

        scheme.validate(&book.osis, chapter, verse)?;

        Ok(VerseReference::new(scheme.name(), &book.osis, chapter, verse))
    }
}

impl Default for ReferenceParser {
    fn default() -> Self {
        Self::new().expect("Failed to create ReferenceParser")
    }
}
