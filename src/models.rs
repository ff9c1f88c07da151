use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::FlashcardError;

pub const DECK_FORMAT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    #[serde(alias = "pregunta")]
    pub question: String,
    #[serde(alias = "respuesta")]
    pub answer: String,
    #[serde(alias = "categoria")]
    pub category: String,
    #[serde(
        default,
        alias = "explicacion",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub explanation: Option<String>,
}

/// Treat a missing, null or whitespace-only explanation as absent
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let explanation = Option::<String>::deserialize(deserializer)?;
    Ok(explanation
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty()))
}

impl Flashcard {
    /// Build a card from trimmed, non-empty fields
    pub fn new(question: &str, answer: &str, category: &str) -> Result<Self, FlashcardError> {
        let question = question.trim();
        let answer = answer.trim();
        let category = category.trim();

        if question.is_empty() {
            return Err(FlashcardError::EmptyField("question"));
        }
        if answer.is_empty() {
            return Err(FlashcardError::EmptyField("answer"));
        }
        if category.is_empty() {
            return Err(FlashcardError::EmptyField("category"));
        }

        Ok(Self {
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            explanation: None,
        })
    }

    /// Attach an explanation; blank text leaves the card without one
    pub fn with_explanation(mut self, explanation: &str) -> Self {
        let explanation = explanation.trim();
        self.explanation = (!explanation.is_empty()).then(|| explanation.to_string());
        self
    }
}

/// Ordered collection of flashcards
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deck {
    cards: Vec<Flashcard>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn push(&mut self, card: Flashcard) {
        self.cards.push(card);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Flashcard> {
        self.cards.iter()
    }

    /// Sorted unique categories
    pub fn categories(&self) -> Vec<String> {
        self.cards
            .iter()
            .map(|card| card.category.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Cards whose category matches case-insensitively
    pub fn filter_by_category(&self, category: &str) -> Deck {
        let wanted = category.trim().to_lowercase();
        self.cards
            .iter()
            .filter(|card| card.category.to_lowercase() == wanted)
            .cloned()
            .collect()
    }

    pub fn into_cards(self) -> Vec<Flashcard> {
        self.cards
    }
}

impl From<Vec<Flashcard>> for Deck {
    fn from(cards: Vec<Flashcard>) -> Self {
        Self { cards }
    }
}

impl FromIterator<Flashcard> for Deck {
    fn from_iter<I: IntoIterator<Item = Flashcard>>(iter: I) -> Self {
        Self {
            cards: iter.into_iter().collect(),
        }
    }
}

impl Extend<Flashcard> for Deck {
    fn extend<I: IntoIterator<Item = Flashcard>>(&mut self, iter: I) {
        self.cards.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Flashcard;
    type IntoIter = std::slice::Iter<'a, Flashcard>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

/// Metadata written in front of the cards of a saved deck
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeckMetadata {
    pub version: String,
    pub card_count: usize,
    #[serde(default)]
    pub generator: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

/// On-disk deck shapes; entries stay untyped so one bad card does not sink the file
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum DeckDocument {
    Enveloped {
        #[serde(default)]
        metadata: Option<serde_json::Value>,
        cards: Vec<serde_json::Value>,
    },
    Bare(Vec<serde_json::Value>),
}

/// Enveloped form used when writing
#[derive(Debug, Serialize)]
pub struct DeckEnvelope<'a> {
    pub metadata: DeckMetadata,
    pub cards: &'a [Flashcard],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QuizOutcome {
    CorrectFirstAttempt,
    CorrectSecondAttempt,
    Incorrect,
}

impl QuizOutcome {
    pub fn points(self) -> f64 {
        match self {
            QuizOutcome::CorrectFirstAttempt => 1.0,
            QuizOutcome::CorrectSecondAttempt => 0.5,
            QuizOutcome::Incorrect => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoreBand {
    Excellent,
    Good,
    NeedsReview,
    KeepStudying,
}

impl ScoreBand {
    pub fn from_percentage(percentage: f64) -> Self {
        if percentage >= 90.0 {
            ScoreBand::Excellent
        } else if percentage >= 70.0 {
            ScoreBand::Good
        } else if percentage >= 50.0 {
            ScoreBand::NeedsReview
        } else {
            ScoreBand::KeepStudying
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            ScoreBand::Excellent => "Excellent! You have mastered this material.",
            ScoreBand::Good => "Good job! You have a solid understanding.",
            ScoreBand::NeedsReview => "Room to improve. Review the material again.",
            ScoreBand::KeepStudying => "Keep studying. Practice makes perfect.",
        }
    }
}

/// Aggregate score of a quiz session
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuizReport {
    pub total_points: f64,
    pub total_possible: f64,
    pub correct_first_attempt: usize,
    pub correct_second_attempt: usize,
    pub incorrect: usize,
    pub skipped: usize,
}

impl QuizReport {
    pub fn from_outcomes(outcomes: &[QuizOutcome], skipped: usize) -> Self {
        let mut report = QuizReport {
            skipped,
            ..Default::default()
        };
        for outcome in outcomes {
            report.total_points += outcome.points();
            report.total_possible += 1.0;
            match outcome {
                QuizOutcome::CorrectFirstAttempt => report.correct_first_attempt += 1,
                QuizOutcome::CorrectSecondAttempt => report.correct_second_attempt += 1,
                QuizOutcome::Incorrect => report.incorrect += 1,
            }
        }
        report
    }

    pub fn questions_scored(&self) -> usize {
        self.correct_first_attempt + self.correct_second_attempt + self.incorrect
    }

    pub fn percentage(&self) -> f64 {
        if self.total_possible > 0.0 {
            self.total_points / self.total_possible * 100.0
        } else {
            0.0
        }
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_percentage(self.percentage())
    }
}

impl fmt::Display for QuizReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(f, "FINAL QUIZ SUMMARY")?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(
            f,
            "Score: {:.1}/{:.1} ({:.1}%)",
            self.total_points,
            self.total_possible,
            self.percentage()
        )?;
        writeln!(f, "Correct (1st attempt): {}", self.correct_first_attempt)?;
        writeln!(f, "Correct (2nd attempt): {}", self.correct_second_attempt)?;
        writeln!(f, "Incorrect: {}", self.incorrect)?;
        if self.skipped > 0 {
            writeln!(f, "Skipped after errors: {}", self.skipped)?;
        }
        write!(f, "{}", self.band().message())
    }
}
