use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::{Parser, Subcommand, ValueEnum};
use tokio::runtime::Handle;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, Layer, layer::SubscriberExt, util::SubscriberInitExt};

use study_engine::config::LoggingConfig;
use study_engine::{
    AppError, Config, Console, Deck, DeckStore, ErrorContext, InputError, MatchPolicy,
    QuizSession, TerminalConsole, card_generator, circle, deck_validator, log_system_event,
    quantity_list, shopping_list,
};

const DEFAULT_LOG_LEVEL: &str = "info,study_engine=debug";

#[derive(Parser)]
#[command(name = "study-engine", about = "Flashcard quizzes and small study utilities", version)]
struct Cli {
    /// Deck file to use (default: DECK_PATH or data/mi_deck.json)
    #[arg(long, global = true)]
    deck: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum MatchArg {
    Exact,
    Contains,
}

impl From<MatchArg> for MatchPolicy {
    fn from(arg: MatchArg) -> Self {
        match arg {
            MatchArg::Exact => MatchPolicy::Exact,
            MatchArg::Contains => MatchPolicy::Contains,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Run an interactive two-attempt quiz over the deck
    Quiz {
        /// Only ask cards from this category (case-insensitive)
        #[arg(long)]
        category: Option<String>,
        /// Answer comparison policy
        #[arg(long = "match", value_enum)]
        policy: Option<MatchArg>,
        /// Ask the cards in file order
        #[arg(long)]
        no_shuffle: bool,
    },

    /// Generate flashcards from a Python source file and save them to the deck
    Generate {
        /// Path to a .py file
        source: PathBuf,
        /// Add to the existing deck instead of replacing it
        #[arg(long)]
        append: bool,
    },

    /// List the cards in the deck and report malformed ones
    Cards {
        #[arg(long)]
        category: Option<String>,
    },

    /// List the deck's categories
    Categories,

    /// Manage a shopping list
    Shopping {
        /// Shopping list file (default: SHOPPING_LIST_PATH or lista_compras.json)
        #[arg(long)]
        file: Option<PathBuf>,
        /// Name and quantity only, kept in memory
        #[arg(long)]
        simple: bool,
    },

    /// Compute the area of a circle
    Circle {
        /// Maximum number of radius attempts
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
        attempts: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let _guard = setup_logging(&LoggingConfig::from_env());

    let config = Config::from_env()?;
    config.validate()?;

    log_system_event!(startup, component = "cli", "study-engine starting");

    let deck_path = cli
        .deck
        .clone()
        .unwrap_or_else(|| config.storage.deck_path.clone());
    let store = DeckStore::default();

    let result = match cli.command {
        Command::Quiz {
            category,
            policy,
            no_shuffle,
        } => {
            let policy = policy.map(MatchPolicy::from).unwrap_or(config.quiz.match_policy);
            let shuffle = config.quiz.shuffle && !no_shuffle;
            run_quiz(&store, &deck_path, category, policy, shuffle).await
        }
        Command::Generate { source, append } => run_generate(&store, &deck_path, &source, append),
        Command::Cards { category } => run_cards(&store, &deck_path, category),
        Command::Categories => run_categories(&store, &deck_path),
        Command::Shopping { file, simple } => {
            if simple {
                interactive("shopping", "quantity_list", |console| {
                    quantity_list::run_menu(console)?;
                    Ok(())
                })
                .await
            } else {
                let path = file.unwrap_or_else(|| config.storage.shopping_list_path.clone());
                interactive("shopping", "shopping_list", move |console| {
                    shopping_list::run_menu(console, &path)?;
                    Ok(())
                })
                .await
            }
        }
        Command::Circle { attempts } => {
            let attempts = attempts.unwrap_or(config.circle.max_attempts);
            interactive("circle", "radius", move |console| {
                circle::prompt_area(console, attempts)?;
                Ok(())
            })
            .await
        }
    };

    log_system_event!(shutdown, component = "cli", "study-engine finished");
    result
}

/// Log the error, then turn its operator message into the process error
fn fail(error: impl Into<AppError>, context: ErrorContext) -> anyhow::Error {
    anyhow!(error.into().to_message_with_context(context))
}

fn deck_context(operation: &str, path: &Path) -> ErrorContext {
    ErrorContext::new(operation, "deck").with_id(&path.display().to_string())
}

fn stdout_console() -> TerminalConsole {
    TerminalConsole::new(Handle::current())
}

fn load_deck(store: &DeckStore, path: &Path) -> Result<Deck> {
    store.try_load(path).map_err(|e| {
        fail(
            e,
            deck_context("load_deck", path).with_user_message("Could not read the deck"),
        )
    })
}

fn load_filtered(store: &DeckStore, path: &Path, category: Option<&str>) -> Result<Deck> {
    let deck = load_deck(store, path)?;
    Ok(match category {
        Some(category) => deck.filter_by_category(category),
        None => deck,
    })
}

/// Run an operator conversation on the blocking pool. Cancellation ends it quietly.
async fn interactive<F>(operation: &'static str, resource_type: &'static str, task: F) -> Result<()>
where
    F: FnOnce(&mut dyn Console) -> Result<(), AppError> + Send + 'static,
{
    let handle = Handle::current();
    let outcome = tokio::task::spawn_blocking(move || {
        let mut console = TerminalConsole::new(handle);
        let context = ErrorContext::new(operation, resource_type);
        match task(&mut console) {
            Ok(()) => Ok(()),
            Err(e @ AppError::Input(InputError::Cancelled)) => {
                let message = e.to_message_with_context(context);
                console.write_line(&message);
                Ok(())
            }
            Err(e) => Err(e.to_message_with_context(context)),
        }
    })
    .await
    .context("interactive task did not complete")?;

    outcome.map_err(|message| anyhow!(message))
}

async fn run_quiz(
    store: &DeckStore,
    deck_path: &Path,
    category: Option<String>,
    policy: MatchPolicy,
    shuffle: bool,
) -> Result<()> {
    let deck = load_filtered(store, deck_path, category.as_deref())?;
    let context_id = deck_path.display().to_string();

    interactive("quiz", "deck", move |console| {
        let session = match QuizSession::new(&deck, policy) {
            Ok(session) => session,
            Err(e) => {
                let message = AppError::from(e).to_message_with_context(
                    ErrorContext::new("start_quiz", "deck").with_id(&context_id),
                );
                console.write_line(&format!("❌ {}", message));
                return Ok(());
            }
        };

        let mut session = if shuffle {
            session
        } else {
            session.without_shuffle()
        };
        session.run(console, &mut rand::thread_rng())?;
        Ok(())
    })
    .await
}

fn run_generate(store: &DeckStore, deck_path: &Path, source: &Path, append: bool) -> Result<()> {
    let mut console = stdout_console();

    let cards = card_generator::generate_from_source(source).map_err(|e| {
        fail(
            e,
            ErrorContext::new("generate_cards", "source")
                .with_id(&source.display().to_string())
                .with_user_message("Could not generate flashcards"),
        )
    })?;

    console.write_line(&format!(
        "🧠 Generated {} flashcards from {}",
        cards.len(),
        source.display()
    ));
    for (i, card) in cards.iter().enumerate() {
        console.write_line(&format!("{}. [{}] {}", i + 1, card.category, card.question));
    }

    let mut deck = if append {
        load_deck(store, deck_path)?
    } else {
        Deck::new()
    };
    deck.extend(cards);

    store.save(&deck, deck_path).map_err(|e| {
        fail(
            e,
            deck_context("save_deck", deck_path).with_user_message("Could not save the deck"),
        )
    })?;

    console.write_line(&format!(
        "💾 Deck saved to {} ({} cards)",
        deck_path.display(),
        deck.len()
    ));
    info!(path = %deck_path.display(), card_count = deck.len(), append, "Generated deck saved");
    Ok(())
}

fn run_cards(store: &DeckStore, deck_path: &Path, category: Option<String>) -> Result<()> {
    let mut console = stdout_console();
    let deck = load_filtered(store, deck_path, category.as_deref())?;

    if deck.is_empty() {
        console.write_line("📭 No flashcards found");
        return Ok(());
    }

    for (i, card) in deck.iter().enumerate() {
        console.write_line(&format!("{}. [{}] {}", i + 1, card.category, card.question));
        console.write_line(&format!("   → {}", card.answer));
    }

    let problems = deck_validator::validate_all(&deck);
    if problems.is_empty() {
        console.write_line(&format!("✅ {} flashcards, all valid", deck.len()));
    } else {
        for problem in &problems {
            console.write_line(&format!("⚠️  {}", problem));
        }
    }
    Ok(())
}

fn run_categories(store: &DeckStore, deck_path: &Path) -> Result<()> {
    let mut console = stdout_console();
    let categories = load_deck(store, deck_path)?.categories();

    if categories.is_empty() {
        console.write_line("📭 No categories found");
    }
    for category in categories {
        console.write_line(&format!("- {}", category));
    }
    Ok(())
}

fn setup_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    use std::fs;
    use tracing_subscriber::fmt;

    let env_filter =
        EnvFilter::try_new(&config.level).unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_LEVEL));

    // Console output goes to stderr and stays quiet so prompts remain readable
    let console_level = config
        .console_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::WARN);
    let console_layer = config.console_enabled.then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_ansi(true)
            .with_filter(console_level)
    });

    let (file_layer, guard) = if config.file_enabled {
        fs::create_dir_all(&config.log_directory).unwrap_or_else(|e| {
            eprintln!("Warning: Could not create logs directory: {}", e);
        });

        // Set up file appender with daily rotation
        let file_appender = tracing_appender::rolling::daily(&config.log_directory, "study-engine.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);

        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_file);
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!(
        log_directory = %config.log_directory,
        file_enabled = config.file_enabled,
        "Logging initialized"
    );

    guard
}
