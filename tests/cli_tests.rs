use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};

use study_engine::deck_store::DeckStore;
use study_engine::{Deck, Flashcard};
use tempfile::TempDir;

fn study_engine(dir: &Path) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_study-engine"));
    command
        .current_dir(dir)
        .env("LOG_FILE_ENABLED", "false")
        .env("LOG_CONSOLE_ENABLED", "false")
        .env_remove("DECK_PATH")
        .env_remove("MATCH_POLICY")
        .env_remove("QUIZ_SHUFFLE");
    command
}

/// Run with `input` on stdin, closing it afterwards
fn run_with_input(mut command: Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(input.as_bytes()).unwrap();
    child.wait_with_output().unwrap()
}

fn capitals(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("mi_deck.json");
    let deck: Deck = vec![
        Flashcard::new("Capital of France?", "Paris", "Geography").unwrap(),
        Flashcard::new("Capital of Japan?", "Tokyo", "Geography").unwrap(),
    ]
    .into();
    DeckStore::default().save(&deck, &path).unwrap();
    path
}

#[test]
fn test_quiz_ends_cleanly_when_input_runs_out() {
    let dir = TempDir::new().unwrap();
    let deck = capitals(dir.path());

    let mut command = study_engine(dir.path());
    command.arg("--deck").arg(&deck).args(["quiz", "--no-shuffle"]);
    let output = run_with_input(command, "Paris\n");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(output.status.success(), "stdout: {}", stdout);
    assert!(stdout.contains("Partial results:"));
    assert!(stdout.contains("👋 See you next time!"));
    println!("✅ Partial session exits 0");
}

#[test]
fn test_quiz_with_no_matching_category() {
    let dir = TempDir::new().unwrap();
    let deck = capitals(dir.path());

    let mut command = study_engine(dir.path());
    command
        .arg("--deck")
        .arg(&deck)
        .args(["quiz", "--category", "Chemistry"]);
    let output = run_with_input(command, "");

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("The flashcard deck is empty"));
}

#[test]
fn test_unreadable_deck_fails() {
    let dir = TempDir::new().unwrap();
    let deck = dir.path().join("deck_dir.json");
    fs::create_dir(&deck).unwrap();

    let mut command = study_engine(dir.path());
    command.arg("--deck").arg(&deck).arg("quiz");
    let output = run_with_input(command, "");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Could not read the deck"));
}

#[test]
fn test_generate_append_extends_deck() {
    let dir = TempDir::new().unwrap();
    let deck = capitals(dir.path());
    let source = dir.path().join("greet.py");
    fs::write(&source, "def greet(name):\n    return 'hi ' + name\n").unwrap();

    let mut command = study_engine(dir.path());
    command
        .arg("--deck")
        .arg(&deck)
        .arg("generate")
        .arg(&source)
        .arg("--append");
    let output = run_with_input(command, "");
    assert!(output.status.success());

    let store = DeckStore::default();
    let appended = store.load(&deck);
    assert_eq!(appended.len(), 4);
    assert_eq!(appended.cards()[0].question, "Capital of France?");
    println!("✅ Append keeps existing cards");

    let mut command = study_engine(dir.path());
    command.arg("--deck").arg(&deck).arg("generate").arg(&source);
    let output = run_with_input(command, "");
    assert!(output.status.success());
    assert_eq!(store.load(&deck).len(), 2);
    println!("✅ Plain generate replaces the deck");
}

#[cfg(unix)]
#[test]
fn test_ctrl_c_at_prompt_exits_promptly() {
    use std::io::Read;
    use std::sync::mpsc;
    use std::thread;
    use std::time::{Duration, Instant};

    let dir = TempDir::new().unwrap();
    let deck = capitals(dir.path());

    let mut child = study_engine(dir.path())
        .arg("--deck")
        .arg(&deck)
        .args(["quiz", "--no-shuffle"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Stdin stays open so the read at the prompt is still pending
    let _stdin = child.stdin.take().unwrap();
    let mut stdout = child.stdout.take().unwrap();
    let (sender, chunks) = mpsc::channel();
    thread::spawn(move || {
        let mut buffer = [0u8; 1024];
        while let Ok(n) = stdout.read(&mut buffer) {
            if n == 0 || sender.send(buffer[..n].to_vec()).is_err() {
                break;
            }
        }
    });

    let mut seen = Vec::new();
    let deadline = Instant::now() + Duration::from_secs(10);
    while !String::from_utf8_lossy(&seen).contains("Your answer: ") {
        let remaining = deadline.saturating_duration_since(Instant::now());
        let chunk = chunks.recv_timeout(remaining).expect("no prompt before the deadline");
        seen.extend(chunk);
    }
    // Give the signal listener time to register
    thread::sleep(Duration::from_millis(500));

    let status = Command::new("kill")
        .args(["-INT", &child.id().to_string()])
        .status()
        .unwrap();
    assert!(status.success());

    let deadline = Instant::now() + Duration::from_secs(5);
    let exit = loop {
        if let Some(exit) = child.try_wait().unwrap() {
            break exit;
        }
        if Instant::now() > deadline {
            child.kill().unwrap();
            panic!("process still running after Ctrl-C");
        }
        thread::sleep(Duration::from_millis(50));
    };
    assert!(exit.success());

    while let Ok(chunk) = chunks.recv_timeout(Duration::from_secs(1)) {
        seen.extend(chunk);
    }
    assert!(String::from_utf8_lossy(&seen).contains("Quiz interrupted"));
    println!("✅ Ctrl-C at the prompt exits 0");
}
