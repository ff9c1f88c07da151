//! Rule-based flashcards from Python source files.
//!
//! The generator does not analyze code; it looks for a handful of telltale
//! substrings and returns canned cards for the concepts they suggest.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::errors::GeneratorError;
use crate::models::Flashcard;
use crate::log_generator_operation;

pub const MIN_CARDS: usize = 3;
pub const MAX_CARDS: usize = 5;

/// Features of the source text that select canned cards
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SourceFeatures {
    pub functions: bool,
    pub classes: bool,
    pub exceptions: bool,
    pub lists: bool,
    pub dicts: bool,
    pub imports: bool,
}

impl SourceFeatures {
    pub fn detect(source: &str) -> Self {
        Self {
            functions: source.contains("def "),
            classes: source.contains("class "),
            exceptions: source.contains("try:") || source.contains("except"),
            lists: source.contains('[') && source.contains(']'),
            dicts: source.contains('{') && source.contains('}'),
            imports: source.contains("import ") || source.contains("from "),
        }
    }
}

fn canned(question: &str, answer: &str, explanation: &str, category: &str) -> Flashcard {
    Flashcard {
        question: question.to_string(),
        answer: answer.to_string(),
        category: category.to_string(),
        explanation: Some(explanation.to_string()),
    }
}

/// Cards for the concepts detected in `source`, padded with a generic card below MIN_CARDS and capped at MAX_CARDS
pub fn generate_from_text(source: &str) -> Vec<Flashcard> {
    let features = SourceFeatures::detect(source);
    let mut cards = Vec::new();

    if features.functions {
        cards.push(canned(
            "What is a function in Python and what is its main purpose?",
            "A reusable block of code that performs a specific task, defined with 'def'",
            "Functions modularize code, avoid repetition and make a program easier to maintain. They are defined once and can be called many times with different arguments.",
            "best_practices",
        ));
    }

    if features.classes {
        cards.push(canned(
            "What does a class represent in object-oriented programming?",
            "A template that defines attributes and methods for creating objects",
            "Classes bundle related data (attributes) and behavior (methods). Many instances can share the same structure with different values.",
            "object_oriented_programming",
        ));
    }

    if features.exceptions {
        cards.push(canned(
            "Why is exception handling with try/except important?",
            "It catches and handles errors without the program ending abruptly",
            "Handling exceptions makes programs more robust and gives users a better experience by dealing with errors in a controlled way.",
            "error_handling",
        ));
    }

    if features.lists || features.dicts {
        let structures = match (features.lists, features.dicts) {
            (true, true) => "lists and dictionaries",
            (true, false) => "lists",
            _ => "dictionaries",
        };
        cards.push(canned(
            &format!("What is the main difference between {} in Python?", structures),
            "Lists store elements ordered by numeric index, dictionaries use keys for direct access",
            "Lists are ordered structures suited to sequences, while dictionaries give fast access by key and map key-value relationships.",
            "data_structures",
        ));
    }

    if features.imports {
        cards.push(canned(
            "What advantage do imports provide in Python?",
            "They let you reuse code from other modules and libraries without rewriting it",
            "Imports enable modularity, code reuse and access to the standard library and third-party packages.",
            "best_practices",
        ));
    }

    if cards.len() < MIN_CARDS {
        cards.push(canned(
            "What is a good practice for writing readable Python code?",
            "Use descriptive names for variables and functions and follow the PEP 8 conventions",
            "Readable code is easier to maintain, debug and share. PEP 8 sets standard conventions that keep code consistent across the Python community.",
            "best_practices",
        ));
    }

    cards.truncate(MAX_CARDS);
    cards
}

/// Read a `.py` file and generate flashcards for it
pub fn generate_from_source(path: &Path) -> Result<Vec<Flashcard>, GeneratorError> {
    if path.extension().and_then(|ext| ext.to_str()) != Some("py") {
        return Err(GeneratorError::NotPythonSource(path.to_path_buf()));
    }

    let source = read_source(path)?;
    log_generator_operation!(start, path = path, length = source.chars().count());

    let cards = generate_from_text(&source);
    log_generator_operation!(success, path = path, card_count = cards.len());
    Ok(cards)
}

fn read_source(path: &Path) -> Result<String, GeneratorError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => GeneratorError::NotFound(path.to_path_buf()),
        _ => GeneratorError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    if !metadata.is_file() {
        return Err(GeneratorError::NotAFile(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|e| GeneratorError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let source = match String::from_utf8(bytes) {
        Ok(source) => source,
        Err(e) => {
            log_generator_operation!(warn, path = path, format!("not valid UTF-8 ({}), decoding as Latin-1", e.utf8_error()));
            // Latin-1 maps every byte to the code point of the same value
            e.into_bytes().into_iter().map(char::from).collect()
        }
    };

    if source.trim().is_empty() {
        return Err(GeneratorError::Empty(path.to_path_buf()));
    }

    Ok(source)
}
