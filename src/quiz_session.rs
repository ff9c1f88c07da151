use rand::Rng;
use rand::seq::SliceRandom;

use crate::answer_matcher::MatchPolicy;
use crate::console::Console;
use crate::deck_validator;
use crate::errors::{InputError, QuizError, ValidationError};
use crate::log_quiz_event;
use crate::models::{Deck, Flashcard, QuizOutcome, QuizReport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    NotStarted,
    InProgress,
    Completed,
    Aborted,
}

/// How a session ended; an aborted session carries the questions scored before the interrupt
#[derive(Debug, Clone, PartialEq)]
pub enum SessionResult {
    Completed(QuizReport),
    Aborted(QuizReport),
}

impl SessionResult {
    pub fn report(&self) -> &QuizReport {
        match self {
            SessionResult::Completed(report) | SessionResult::Aborted(report) => report,
        }
    }

    pub fn is_aborted(&self) -> bool {
        matches!(self, SessionResult::Aborted(_))
    }
}

/// Scored result of one question
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionRecord {
    pub question: String,
    pub outcome: QuizOutcome,
    pub attempts: Vec<String>,
}

/// Two-attempt quiz over a session-local copy of a deck
#[derive(Debug)]
pub struct QuizSession {
    cards: Vec<Flashcard>,
    policy: MatchPolicy,
    shuffle: bool,
    state: SessionState,
    records: Vec<QuestionRecord>,
    skipped: usize,
}

impl QuizSession {
    pub fn new(deck: &Deck, policy: MatchPolicy) -> Result<Self, ValidationError> {
        deck_validator::validate(deck)?;

        Ok(Self {
            cards: deck.cards().to_vec(),
            policy,
            shuffle: true,
            state: SessionState::NotStarted,
            records: Vec::new(),
            skipped: 0,
        })
    }

    /// Play the cards in deck order
    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Cards in the order they are (or will be) asked
    pub fn questions(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn report(&self) -> QuizReport {
        let outcomes: Vec<QuizOutcome> = self.records.iter().map(|r| r.outcome).collect();
        QuizReport::from_outcomes(&outcomes, self.skipped)
    }

    /// Play every question once. Only valid from `NotStarted`.
    pub fn run<R: Rng + ?Sized>(
        &mut self,
        console: &mut dyn Console,
        rng: &mut R,
    ) -> Result<SessionResult, QuizError> {
        if self.state != SessionState::NotStarted {
            return Err(QuizError::AlreadyRun);
        }

        if self.shuffle {
            self.cards.shuffle(rng);
        }
        self.state = SessionState::InProgress;
        log_quiz_event!(started, card_count = self.cards.len(), policy = self.policy);

        let total = self.cards.len();
        console.write_line("🎓 WELCOME TO THE INTERACTIVE QUIZ!");
        console.write_line(&format!("📝 You have {} questions to answer.", total));
        console.write_line("💡 Remember: you get 2 attempts per question.");
        console.write_line("🏆 Scoring: 1 point (1st attempt), 0.5 points (2nd attempt)");

        for (index, card) in self.cards.iter().enumerate() {
            let number = index + 1;
            match ask_question(card, number, total, self.policy, console) {
                Ok(record) => {
                    log_quiz_event!(scored, question = number, outcome = record.outcome);
                    self.records.push(record);
                }
                Err(InputError::Cancelled) => {
                    self.state = SessionState::Aborted;
                    log_quiz_event!(aborted, answered = self.records.len());
                    console.write_line("");
                    console.write_line("⏸️  Quiz interrupted by the operator.");

                    let report = self.report();
                    if report.questions_scored() > 0 {
                        console.write_line("Partial results:");
                        console.write_line(&report.to_string());
                    }
                    console.write_line("👋 See you next time!");
                    return Ok(SessionResult::Aborted(report));
                }
                Err(e) => {
                    self.skipped += 1;
                    log_quiz_event!(skipped, question = number, error = e);
                    console.write_line(&format!("⚠️  Error processing question {}: {}", number, e));
                }
            }
        }

        self.state = SessionState::Completed;
        let report = self.report();
        log_quiz_event!(
            completed,
            points = report.total_points,
            possible = report.total_possible
        );
        console.write_line("");
        console.write_line(&report.to_string());
        Ok(SessionResult::Completed(report))
    }
}

fn show_explanation(console: &mut dyn Console, card: &Flashcard, label: &str) {
    if let Some(explanation) = &card.explanation {
        console.write_line(&format!("💡 {}: {}", label, explanation));
    }
}

fn ask_question(
    card: &Flashcard,
    number: usize,
    total: usize,
    policy: MatchPolicy,
    console: &mut dyn Console,
) -> Result<QuestionRecord, InputError> {
    let rule = "=".repeat(50);
    console.write_line("");
    console.write_line(&rule);
    console.write_line(&format!(
        "Question {}/{} | Category: {}",
        number, total, card.category
    ));
    console.write_line(&rule);
    console.write_line(&format!("❓ {}", card.question));

    let first = console.read_line("Your answer: ")?;
    if policy.matches(&first, &card.answer) {
        console.write_line("✅ Correct! Great job.");
        show_explanation(console, card, "More info");
        return Ok(QuestionRecord {
            question: card.question.clone(),
            outcome: QuizOutcome::CorrectFirstAttempt,
            attempts: vec![first],
        });
    }

    console.write_line("❌ Incorrect. You have 1 attempt left.");
    let second = console.read_line("Your answer (last attempt): ")?;
    let outcome = if policy.matches(&second, &card.answer) {
        console.write_line("✅ Correct on the second attempt!");
        show_explanation(console, card, "More info");
        QuizOutcome::CorrectSecondAttempt
    } else {
        console.write_line(&format!(
            "❌ Incorrect. The correct answer was: '{}'",
            card.answer
        ));
        show_explanation(console, card, "Explanation");
        QuizOutcome::Incorrect
    };

    Ok(QuestionRecord {
        question: card.question.clone(),
        outcome,
        attempts: vec![first, second],
    })
}
