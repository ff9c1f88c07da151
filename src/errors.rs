use std::io;
use std::path::PathBuf;

use tracing::{error, info, warn};

/// Rejection of a flashcard at construction time
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FlashcardError {
    #[error("Flashcard field '{0}' cannot be empty")]
    EmptyField(&'static str),
}

/// Structural problems that prevent a quiz from running
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("The flashcard deck is empty")]
    EmptyDeck,

    #[error("Flashcard #{index} is missing required field '{field}'", index = .0 + 1, field = .1)]
    MalformedCard(usize, &'static str),
}

/// Deck or list file could not be read or written
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PersistenceError {
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PersistenceError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Failure while waiting on operator input
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Interrupt signal or closed input stream
    #[error("Input cancelled by the operator")]
    Cancelled,

    #[error("Input error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum QuizError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("This quiz session has already been run")]
    AlreadyRun,
}

#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("Source file must have a .py extension, got: {}", .0.display())]
    NotPythonSource(PathBuf),

    #[error("Source file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Path does not point to a regular file: {}", .0.display())]
    NotAFile(PathBuf),

    #[error("Source file is empty: {}", .0.display())]
    Empty(PathBuf),

    #[error("Could not read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ShoppingError {
    #[error("Item name cannot be empty")]
    EmptyName,

    #[error("Price cannot be negative")]
    NegativePrice,

    #[error("Price must be a finite number")]
    InvalidPrice,

    #[error("Quantity must be at least 1")]
    InvalidQuantity,

    #[error("Index {index} out of range for a list of {len} items")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("'{0}' is not on the list")]
    ItemNotFound(String),

    #[error("Discount must be between 0 and 100 percent, got {0}")]
    InvalidDiscount(f64),
}

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum GeometryError {
    #[error("Radius cannot be negative")]
    NegativeRadius,

    #[error("Radius must be a finite number")]
    NotFinite,
}

/// Umbrella error for reporting failures to the operator
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Quiz(#[from] QuizError),

    #[error(transparent)]
    Generator(#[from] GeneratorError),

    #[error(transparent)]
    Shopping(#[from] ShoppingError),

    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Flashcard(#[from] FlashcardError),
}

/// Error context for structured logging
#[derive(Debug)]
pub struct ErrorContext {
    pub operation: String,
    pub resource_id: Option<String>,
    pub resource_type: String,
    pub user_friendly_message: Option<String>,
}

impl ErrorContext {
    pub fn new(operation: &str, resource_type: &str) -> Self {
        Self {
            operation: operation.to_string(),
            resource_id: None,
            resource_type: resource_type.to_string(),
            user_friendly_message: None,
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.resource_id = Some(id.to_string());
        self
    }

    pub fn with_user_message(mut self, message: &str) -> Self {
        self.user_friendly_message = Some(message.to_string());
        self
    }
}

impl AppError {
    /// Log the error at a level matching its kind and return the operator-facing message
    pub fn to_message_with_context(self, context: ErrorContext) -> String {
        match &self {
            AppError::Input(InputError::Cancelled) => {
                info!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    "Operation cancelled by operator"
                );
                context
                    .user_friendly_message
                    .unwrap_or_else(|| "Cancelled.".to_string())
            }
            AppError::Validation(_)
            | AppError::Quiz(_)
            | AppError::Shopping(_)
            | AppError::Geometry(_)
            | AppError::Flashcard(_) => {
                warn!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Rejected operator request"
                );
                context.user_friendly_message.unwrap_or_else(|| self.to_string())
            }
            AppError::Persistence(_) | AppError::Generator(_) | AppError::Input(_) => {
                error!(
                    operation = %context.operation,
                    resource_type = %context.resource_type,
                    resource_id = ?context.resource_id,
                    error = %self,
                    "Operation failed"
                );
                match context.user_friendly_message {
                    Some(message) => format!("{}: {}", message, self),
                    None => format!("{} failed: {}", context.operation, self),
                }
            }
        }
    }

    /// Simple conversion without context
    pub fn to_message(self) -> String {
        let context = ErrorContext::new("unknown", "resource");
        self.to_message_with_context(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_context_creation() {
        let context = ErrorContext::new("load_deck", "deck")
            .with_id("data/mi_deck.json")
            .with_user_message("Custom message");

        assert_eq!(context.operation, "load_deck");
        assert_eq!(context.resource_type, "deck");
        assert_eq!(context.resource_id, Some("data/mi_deck.json".to_string()));
        assert_eq!(
            context.user_friendly_message,
            Some("Custom message".to_string())
        );
    }

    #[test]
    fn test_malformed_card_message_is_one_based() {
        let error = ValidationError::MalformedCard(0, "answer");
        assert_eq!(
            error.to_string(),
            "Flashcard #1 is missing required field 'answer'"
        );
    }

    #[test]
    fn test_messages_by_error_kind() {
        let message = AppError::from(ValidationError::EmptyDeck).to_message();
        assert_eq!(message, "The flashcard deck is empty");

        let message = AppError::from(InputError::Cancelled)
            .to_message_with_context(ErrorContext::new("quiz", "session"));
        assert_eq!(message, "Cancelled.");

        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let message = AppError::from(PersistenceError::io("deck.json", io_error))
            .to_message_with_context(
                ErrorContext::new("save_deck", "deck").with_user_message("Could not save the deck"),
            );
        assert!(message.starts_with("Could not save the deck: "));
        assert!(message.contains("deck.json"));
    }
}
