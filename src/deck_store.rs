//! JSON persistence for flashcard decks
//!
//! Two file shapes are accepted on load:
//! ```text
//! [ {question, answer, category, explanation?}, ... ]
//! { "metadata": {...}, "cards": [ ... ] }
//! ```
//! Saves always write the enveloped shape.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use chrono::Utc;

use crate::errors::PersistenceError;
use crate::log_store_operation;
use crate::models::{DECK_FORMAT_VERSION, Deck, DeckDocument, DeckEnvelope, DeckMetadata, Flashcard};

pub const DEFAULT_GENERATOR: &str = concat!("study-engine/", env!("CARGO_PKG_VERSION"));

/// Loads and saves decks, stamping saved files with a generator label
#[derive(Debug, Clone)]
pub struct DeckStore {
    generator: String,
}

impl Default for DeckStore {
    fn default() -> Self {
        Self::new(DEFAULT_GENERATOR)
    }
}

impl DeckStore {
    pub fn new(generator: &str) -> Self {
        Self {
            generator: generator.to_string(),
        }
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    /// Load a deck, falling back to an empty deck on any failure
    pub fn load(&self, path: &Path) -> Deck {
        self.try_load(path).unwrap_or_else(|e| {
            log_store_operation!(error, "load_deck", path = path, error = e);
            Deck::new()
        })
    }

    /// Load a deck; only I/O failures other than a missing file are errors
    pub fn try_load(&self, path: &Path) -> Result<Deck, PersistenceError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log_store_operation!(info, "load_deck", path = path, "file not found, starting with an empty deck");
                return Ok(Deck::new());
            }
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                log_store_operation!(warn, "load_deck", path = path, format!("file is not valid UTF-8, starting with an empty deck: {}", e));
                return Ok(Deck::new());
            }
            Err(e) => return Err(PersistenceError::io(path, e)),
        };

        let deck = parse_deck(&content, path);
        log_store_operation!(debug, "load_deck", path = path, count = deck.len());
        Ok(deck)
    }

    /// Write the deck in enveloped form, creating parent directories as needed
    pub fn save(&self, deck: &Deck, path: &Path) -> Result<(), PersistenceError> {
        let result = self.write_deck(deck, path);
        match &result {
            Ok(()) => {
                log_store_operation!(debug, "save_deck", path = path, count = deck.len());
            }
            Err(e) => {
                log_store_operation!(error, "save_deck", path = path, error = e);
            }
        }
        result
    }

    fn write_deck(&self, deck: &Deck, path: &Path) -> Result<(), PersistenceError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| PersistenceError::io(parent, e))?;
                log_store_operation!(info, "save_deck", path = parent, "directory created");
            }
        }

        let envelope = DeckEnvelope {
            metadata: DeckMetadata {
                version: DECK_FORMAT_VERSION.to_string(),
                card_count: deck.len(),
                generator: self.generator.clone(),
                saved_at: Some(Utc::now()),
            },
            cards: deck.cards(),
        };

        let json = serde_json::to_string_pretty(&envelope)?;
        fs::write(path, json).map_err(|e| PersistenceError::io(path, e))
    }
}

/// Why a file's contents could not be read as a deck document
#[derive(Debug)]
enum DocumentError {
    InvalidJson(serde_json::Error),
    UnrecognizedShape(serde_json::Error),
}

fn decode_document(content: &str) -> Result<DeckDocument, DocumentError> {
    let value: serde_json::Value =
        serde_json::from_str(content).map_err(DocumentError::InvalidJson)?;
    serde_json::from_value(value).map_err(DocumentError::UnrecognizedShape)
}

/// Decode either file shape into a deck, skipping entries that are not flashcards
pub fn parse_deck(content: &str, path: &Path) -> Deck {
    let document = match decode_document(content) {
        Ok(document) => document,
        Err(DocumentError::InvalidJson(e)) => {
            log_store_operation!(warn, "load_deck", path = path, format!("invalid deck JSON, starting with an empty deck: {}", e));
            return Deck::new();
        }
        Err(DocumentError::UnrecognizedShape(e)) => {
            log_store_operation!(warn, "load_deck", path = path, format!("unrecognized deck shape, expected a card array or an object with 'cards', starting with an empty deck: {}", e));
            return Deck::new();
        }
    };

    let entries = match document {
        DeckDocument::Bare(entries) => entries,
        DeckDocument::Enveloped { metadata, cards } => {
            check_metadata(metadata, cards.len(), path);
            cards
        }
    };

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value::<Flashcard>(entry) {
            Ok(card) => Some(card),
            Err(e) => {
                log_store_operation!(warn, "load_deck", path = path, format!("entry {} is not a valid flashcard, skipping: {}", index, e));
                None
            }
        })
        .collect()
}

fn check_metadata(metadata: Option<serde_json::Value>, actual: usize, path: &Path) {
    let Some(raw) = metadata else {
        return;
    };

    match serde_json::from_value::<DeckMetadata>(raw) {
        Ok(metadata) if metadata.card_count != actual => {
            log_store_operation!(warn, "load_deck", path = path, format!(
                "metadata reports {} cards but the file holds {}",
                metadata.card_count, actual
            ));
        }
        Ok(_) => {}
        Err(e) => {
            log_store_operation!(warn, "load_deck", path = path, format!("ignoring unreadable metadata: {}", e));
        }
    }
}

/// Load with the default store
pub fn load(path: &Path) -> Deck {
    DeckStore::default().load(path)
}

/// Save with the default store
pub fn save(deck: &Deck, path: &Path) -> Result<(), PersistenceError> {
    DeckStore::default().save(deck, path)
}
