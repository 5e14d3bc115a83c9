use crate::models::{BookDefinition, VersificationData};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;
use std::sync::Arc;
use walkdir::WalkDir;

/// A versification scheme: a name plus the chapter/verse layout of its books.
///
/// Handles compare and hash by name only.
#[derive(Debug, Clone)]
pub struct Versification {
    name: String,
    books: Vec<BookDefinition>,
}

impl Versification {
    pub fn from_data(data: VersificationData) -> Self {
        Versification {
            name: data.name,
            books: data.books,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn books(&self) -> &[BookDefinition] {
        &self.books
    }

    /// Finds a book by OSIS id or by name, ignoring case and spaces.
    pub fn resolve_book(&self, name: &str) -> Option<&BookDefinition> {
        let wanted = squash(name);
        self.books
            .iter()
            .find(|book| squash(&book.osis) == wanted || squash(&book.name) == wanted)
    }

    /// Checks that `book chapter:verse` is a legal address. Verse 0 is legal in
    /// every existing chapter.
    pub fn validate(&self, book: &str, chapter: u32, verse: u32) -> Result<()> {
        let definition = self
            .books
            .iter()
            .find(|b| b.osis == book)
            .ok_or_else(|| anyhow::anyhow!("No such verse: book {} is not in {}", book, self.name))?;

        let last_verse = definition.last_verse(chapter).ok_or_else(|| {
            anyhow::anyhow!(
                "No such verse: {} has {} chapters in {}, not {}",
                book,
                definition.chapter_count(),
                self.name,
                chapter
            )
        })?;

        if verse > last_verse {
            return Err(anyhow::anyhow!(
                "No such verse: {}.{} ends at verse {} in {}, not {}",
                book,
                chapter,
                last_verse,
                self.name,
                verse
            ));
        }

        Ok(())
    }
}

fn squash(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(|c| c.to_lowercase())
        .collect()
}

impl PartialEq for Versification {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Versification {}

impl Hash for Versification {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Display for Versification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Resolves versification names to shared handles.
#[derive(Debug, Clone, Default)]
pub struct VersificationRegistry {
    schemes: HashMap<String, Arc<Versification>>,
}

impl VersificationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a registry from a single JSON file or from every `*.json` file
    /// below a directory.
    pub fn load(path: &Path) -> Result<Self> {
        if path.is_dir() {
            Self::from_dir(path)
        } else {
            Self::from_file(path)
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let mut registry = Self::new();
        registry.register_file(path)?;
        Ok(registry)
    }

    pub fn from_dir(dir: &Path) -> Result<Self> {
        let mut registry = Self::new();

        let mut files: Vec<_> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| e.path().extension().and_then(|x| x.to_str()) == Some("json"))
            .map(|e| e.path().to_path_buf())
            .collect();
        files.sort();

        for file in &files {
            registry.register_file(file)?;
        }

        if registry.schemes.is_empty() {
            return Err(anyhow::anyhow!(
                "No versification files found in {:?}",
                dir
            ));
        }

        Ok(registry)
    }

    fn register_file(&mut self, path: &Path) -> Result<()> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read versification file: {:?}", path))?;
        let data: VersificationData = serde_json::from_str(&content)
            .with_context(|| format!("Invalid versification file: {:?}", path))?;
        self.register(Versification::from_data(data));
        Ok(())
    }

    pub fn register(&mut self, versification: Versification) -> Arc<Versification> {
        let handle = Arc::new(versification);
        self.schemes
            .insert(handle.name().to_string(), Arc::clone(&handle));
        handle
    }

    pub fn get(&self, name: &str) -> Result<Arc<Versification>> {
        self.schemes
            .get(name)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("Unknown versification: {}", name))
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.schemes.keys().cloned().collect();
        names.sort();
        names
    }
}
