pub mod answer_matcher;
pub mod card_generator;
pub mod circle;
pub mod config;
pub mod console;
pub mod deck_store;
pub mod deck_validator;
pub mod errors;
pub mod logging;
pub mod models;
pub mod quantity_list;
pub mod quiz_session;
pub mod shopping_list;

#[cfg(test)]
mod tests {
    mod quiz_flow_test;
}

pub use answer_matcher::MatchPolicy;
pub use config::Config;
pub use console::{Console, ScriptedConsole, TerminalConsole};
pub use deck_store::DeckStore;
pub use errors::*;
pub use models::*;
pub use quantity_list::QuantityList;
pub use quiz_session::{QuizSession, SessionResult, SessionState};
pub use shopping_list::ShoppingList;
