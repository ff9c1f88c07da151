use std::fs;

use study_engine::GeneratorError;
use study_engine::card_generator::{MAX_CARDS, generate_from_source};
use study_engine::deck_validator;
use tempfile::TempDir;

#[test]
fn test_non_python_source_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("notes.txt");
    fs::write(&path, "def not_really_python(): pass").unwrap();

    assert!(matches!(
        generate_from_source(&path),
        Err(GeneratorError::NotPythonSource(_))
    ));
}

#[test]
fn test_missing_file_rejected() {
    let dir = TempDir::new().unwrap();
    let result = generate_from_source(&dir.path().join("missing.py"));
    assert!(matches!(result, Err(GeneratorError::NotFound(_))));
}

#[test]
fn test_directory_and_empty_file_rejected() {
    let dir = TempDir::new().unwrap();
    let folder = dir.path().join("package.py");
    fs::create_dir(&folder).unwrap();
    assert!(matches!(
        generate_from_source(&folder),
        Err(GeneratorError::NotAFile(_))
    ));

    let empty = dir.path().join("empty.py");
    fs::write(&empty, "  \n\n").unwrap();
    assert!(matches!(
        generate_from_source(&empty),
        Err(GeneratorError::Empty(_))
    ));
}

#[test]
fn test_function_only_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("greet.py");
    fs::write(&path, "def greet(name):\n    return 'hi ' + name\n").unwrap();

    let cards = generate_from_source(&path).unwrap();
    assert_eq!(cards.len(), 2);
    assert!(cards[0].question.contains("function"));
    assert!(cards[1].answer.contains("PEP 8"));
}

#[test]
fn test_generated_cards_form_a_valid_deck() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("inventory.py");
    fs::write(
        &path,
        "from dataclasses import dataclass\nimport json\n\nclass Inventory:\n    def __init__(self):\n        self.items = []\n        self.index = {}\n\n    def load(self, path):\n        try:\n            return json.load(open(path))\n        except OSError:\n            return None\n",
    )
    .unwrap();

    let cards = generate_from_source(&path).unwrap();
    assert_eq!(cards.len(), MAX_CARDS);
    assert!(deck_validator::validate(&cards.into()).is_ok());
}

#[test]
fn test_latin1_source_is_decoded() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("legacy.py");
    // "# café" in Latin-1, then a class
    let mut bytes = b"# caf".to_vec();
    bytes.push(0xe9);
    bytes.extend_from_slice(b"\nclass Legacy:\n    pass\n");
    fs::write(&path, bytes).unwrap();

    let cards = generate_from_source(&path).unwrap();
    assert!(cards.iter().any(|c| c.category == "object_oriented_programming"));
}
