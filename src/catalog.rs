use include_dir::{include_dir, Dir};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::CatalogError;

static DATA_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/data");

const EMBEDDED_CATALOG: &str = "catalog.json";

pub const DEFAULT_CLIP_COUNT: u32 = 5;

fn default_clip_count() -> u32 {
    DEFAULT_CLIP_COUNT
}

/// One guessable subject: where it aired and who the guest was
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PuzzleDefinition {
    pub id: String,
    pub show: String,
    pub date: String,
    pub answer: String,
    pub clip_count: u32,
}

impl PuzzleDefinition {
    /// Trimmed, case-insensitive comparison against the answer
    pub fn is_answer(&self, guess: &str) -> bool {
        guess.trim().to_lowercase() == self.answer.trim().to_lowercase()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPuzzle {
    show: String,
    date: String,
    answer: String,
    #[serde(default = "default_clip_count")]
    clip_count: u32,
}

/// Read-only mapping from puzzle id to its definition, in the order the
/// puzzles were listed. Never empty.
#[derive(Debug, Clone)]
pub struct PuzzleCatalog {
    puzzles: IndexMap<String, PuzzleDefinition>,
}

impl PuzzleCatalog {
    pub fn new(puzzles: impl IntoIterator<Item = PuzzleDefinition>) -> Result<Self, CatalogError> {
        let puzzles: IndexMap<String, PuzzleDefinition> = puzzles
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        if puzzles.is_empty() {
            return Err(CatalogError::Empty);
        }

        for puzzle in puzzles.values() {
            if puzzle.answer.trim().is_empty() {
                return Err(CatalogError::EmptyAnswer {
                    id: puzzle.id.clone(),
                });
            }
            if puzzle.clip_count == 0 {
                return Err(CatalogError::ZeroClips {
                    id: puzzle.id.clone(),
                });
            }
        }

        Ok(Self { puzzles })
    }

    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let raw: IndexMap<String, RawPuzzle> = serde_json::from_str(json)?;
        Self::new(raw.into_iter().map(|(id, p)| PuzzleDefinition {
            id,
            show: p.show,
            date: p.date,
            answer: p.answer,
            clip_count: p.clip_count,
        }))
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// The catalog compiled into the binary
    pub fn embedded() -> Result<Self, CatalogError> {
        let json = DATA_DIR
            .get_file(EMBEDDED_CATALOG)
            .and_then(|f| f.contents_utf8())
            .ok_or(CatalogError::MissingEmbedded(EMBEDDED_CATALOG))?;
        Self::from_json(json)
    }

    pub fn get(&self, id: &str) -> Option<&PuzzleDefinition> {
        self.puzzles.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.puzzles.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.puzzles.keys().map(String::as_str)
    }

    pub fn puzzles(&self) -> impl Iterator<Item = &PuzzleDefinition> {
        self.puzzles.values()
    }

    pub fn len(&self) -> usize {
        self.puzzles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.puzzles.is_empty()
    }

    /// The puzzle opened by default
    pub fn first(&self) -> &PuzzleDefinition {
        // construction rejects empty catalogs
        &self.puzzles[0]
    }

    pub fn first_id(&self) -> &str {
        &self.first().id
    }

    /// Next id in tab order, wrapping around
    pub fn next_id(&self, id: &str) -> Option<&str> {
        let pos = self.puzzles.get_index_of(id)?;
        self.id_at((pos + 1) % self.len())
    }

    /// Previous id in tab order, wrapping around
    pub fn prev_id(&self, id: &str) -> Option<&str> {
        let pos = self.puzzles.get_index_of(id)?;
        self.id_at((pos + self.len() - 1) % self.len())
    }

    fn id_at(&self, index: usize) -> Option<&str> {
        self.puzzles.get_index(index).map(|(id, _)| id.as_str())
    }
}

#[cfg(test)]
pub(crate) fn puzzle(id: &str, answer: &str, clip_count: u32) -> PuzzleDefinition {
    PuzzleDefinition {
        id: id.to_string(),
        show: format!("Show {id}"),
        date: "Jan 1, 2025".to_string(),
        answer: answer.to_string(),
        clip_count,
    }
}
