use std::env;
use std::path::PathBuf;

use study_engine::{Config, MatchPolicy};

// Environment variables are process-wide, so every scenario runs in one test
#[test]
fn test_config_from_environment() {
    unsafe {
        env::remove_var("DECK_PATH");
        env::remove_var("MATCH_POLICY");
        env::remove_var("QUIZ_SHUFFLE");
        env::remove_var("CIRCLE_MAX_ATTEMPTS");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.storage.deck_path, PathBuf::from("data/mi_deck.json"));
    assert_eq!(config.quiz.match_policy, MatchPolicy::Exact);
    assert!(config.quiz.shuffle);
    assert_eq!(config.circle.max_attempts, 3);
    println!("✅ Defaults applied");

    unsafe {
        env::set_var("DECK_PATH", "decks/rust.json");
        env::set_var("MATCH_POLICY", "Substring");
        env::set_var("QUIZ_SHUFFLE", "false");
        env::set_var("CIRCLE_MAX_ATTEMPTS", "5");
    }

    let config = Config::from_env().unwrap();
    assert_eq!(config.storage.deck_path, PathBuf::from("decks/rust.json"));
    assert_eq!(config.quiz.match_policy, MatchPolicy::Contains);
    assert!(!config.quiz.shuffle);
    assert_eq!(config.circle.max_attempts, 5);
    assert!(config.validate().is_ok());
    println!("✅ Overrides applied");

    unsafe { env::set_var("MATCH_POLICY", "fuzzy"); }
    assert_eq!(Config::from_env().unwrap().quiz.match_policy, MatchPolicy::Exact);

    unsafe { env::set_var("CIRCLE_MAX_ATTEMPTS", "three"); }
    assert!(Config::from_env().is_err());

    unsafe { env::set_var("CIRCLE_MAX_ATTEMPTS", "0"); }
    let config = Config::from_env().unwrap();
    assert!(config.validate().is_err());
    println!("✅ Invalid values rejected");

    unsafe {
        env::remove_var("DECK_PATH");
        env::remove_var("MATCH_POLICY");
        env::remove_var("QUIZ_SHUFFLE");
        env::remove_var("CIRCLE_MAX_ATTEMPTS");
    }
}
