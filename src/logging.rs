// Macros file - tracing macros are imported within the macro definitions

/// Standardized logging macros for consistent field names and message patterns across the crate
///
/// These macros ensure:
/// - Consistent field naming conventions
/// - Appropriate logging levels for different scenarios
/// - Structured logging with context

// ============================================================================
// Deck Store Logging Macros
// ============================================================================

/// Log deck and list file operations
#[macro_export]
macro_rules! log_store_operation {
    (debug, $operation:expr, path = $path:expr, count = $count:expr) => {
        tracing::debug!(
            component = "store",
            operation = $operation,
            path = %$path.display(),
            card_count = $count,
            "Store operation completed"
        );
    };
    (info, $operation:expr, path = $path:expr, $msg:expr) => {
        tracing::info!(
            component = "store",
            operation = $operation,
            path = %$path.display(),
            "Store operation: {}", $msg
        );
    };
    (warn, $operation:expr, path = $path:expr, $msg:expr) => {
        tracing::warn!(
            component = "store",
            operation = $operation,
            path = %$path.display(),
            "Store warning: {}", $msg
        );
    };
    (error, $operation:expr, path = $path:expr, error = $error:expr) => {
        tracing::error!(
            component = "store",
            operation = $operation,
            path = %$path.display(),
            error = %$error,
            "Store operation failed"
        );
    };
}

// ============================================================================
// Quiz Session Logging Macros
// ============================================================================

/// Log quiz session lifecycle and per-question scoring
#[macro_export]
macro_rules! log_quiz_event {
    (started, card_count = $count:expr, policy = $policy:expr) => {
        tracing::info!(
            component = "quiz_session",
            event_type = "started",
            card_count = $count,
            policy = %$policy,
            "Quiz session started"
        );
    };
    (scored, question = $number:expr, outcome = $outcome:expr) => {
        tracing::debug!(
            component = "quiz_session",
            event_type = "scored",
            question = $number,
            outcome = ?$outcome,
            "Question scored"
        );
    };
    (skipped, question = $number:expr, error = $error:expr) => {
        tracing::warn!(
            component = "quiz_session",
            event_type = "skipped",
            question = $number,
            error = %$error,
            "Question skipped after an error"
        );
    };
    (aborted, answered = $answered:expr) => {
        tracing::info!(
            component = "quiz_session",
            event_type = "aborted",
            answered = $answered,
            "Quiz session aborted by operator"
        );
    };
    (completed, points = $points:expr, possible = $possible:expr) => {
        tracing::info!(
            component = "quiz_session",
            event_type = "completed",
            points = $points,
            possible = $possible,
            "Quiz session completed"
        );
    };
}

// ============================================================================
// Card Generator Logging Macros
// ============================================================================

/// Log flashcard generation from source files
#[macro_export]
macro_rules! log_generator_operation {
    (start, path = $path:expr, length = $length:expr) => {
        tracing::info!(
            component = "card_generator",
            path = %$path.display(),
            source_length = $length,
            "Analyzing source for flashcards"
        );
    };
    (success, path = $path:expr, card_count = $count:expr) => {
        tracing::info!(
            component = "card_generator",
            path = %$path.display(),
            card_count = $count,
            "Flashcards generated"
        );
    };
    (warn, path = $path:expr, $msg:expr) => {
        tracing::warn!(
            component = "card_generator",
            path = %$path.display(),
            "Generator warning: {}", $msg
        );
    };
}

// ============================================================================
// System Event Logging Macros
// ============================================================================

/// Log system startup and shutdown events
#[macro_export]
macro_rules! log_system_event {
    (startup, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "startup",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (shutdown, component = $component:expr, $msg:expr) => {
        tracing::info!(
            event_type = "shutdown",
            component = $component,
            "System event: {}",
            $msg
        );
    };
    (config, $msg:expr) => {
        tracing::info!(event_type = "configuration", "System event: {}", $msg);
    };
}

// ============================================================================
// Validation Logging Macros
// ============================================================================

/// Log validation results consistently
#[macro_export]
macro_rules! log_validation {
    (success, $component:expr, $msg:expr) => {
        tracing::debug!(
            event_type = "validation",
            component = $component,
            result = "success",
            "Validation completed: {}", $msg
        );
    };
    (failure, $component:expr, error = $error:expr) => {
        tracing::warn!(
            event_type = "validation",
            component = $component,
            result = "failure",
            error = %$error,
            "Validation failed"
        );
    };
}
