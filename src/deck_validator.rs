use crate::errors::ValidationError;
use crate::log_validation;
use crate::models::{Deck, Flashcard};

/// First required field of a card that is blank after trimming
fn first_blank_field(card: &Flashcard) -> Option<&'static str> {
    [
        ("question", card.question.as_str()),
        ("answer", card.answer.as_str()),
        ("category", card.category.as_str()),
    ]
    .into_iter()
    .find(|(_, value)| value.trim().is_empty())
    .map(|(field, _)| field)
}

/// Check that a deck can be quizzed, stopping at the first problem
pub fn validate(deck: &Deck) -> Result<(), ValidationError> {
    let result = check(deck);
    match &result {
        Ok(()) => {
            log_validation!(success, "deck_validator", format!("{} cards", deck.len()));
        }
        Err(e) => {
            log_validation!(failure, "deck_validator", error = e);
        }
    }
    result
}

fn check(deck: &Deck) -> Result<(), ValidationError> {
    if deck.is_empty() {
        return Err(ValidationError::EmptyDeck);
    }

    for (index, card) in deck.iter().enumerate() {
        if let Some(field) = first_blank_field(card) {
            return Err(ValidationError::MalformedCard(index, field));
        }
    }

    Ok(())
}

/// Every problem in the deck, in card order
pub fn validate_all(deck: &Deck) -> Vec<ValidationError> {
    if deck.is_empty() {
        return vec![ValidationError::EmptyDeck];
    }

    deck.iter()
        .enumerate()
        .filter_map(|(index, card)| {
            first_blank_field(card).map(|field| ValidationError::MalformedCard(index, field))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(question: &str, answer: &str, category: &str) -> Flashcard {
        Flashcard {
            question: question.to_string(),
            answer: answer.to_string(),
            category: category.to_string(),
            explanation: None,
        }
    }

    #[test]
    fn test_empty_deck_rejected() {
        assert_eq!(validate(&Deck::new()), Err(ValidationError::EmptyDeck));
    }

    #[test]
    fn test_blank_answer_reported_with_index() {
        let deck: Deck = vec![raw("Q", "", "C")].into();
        assert_eq!(
            validate(&deck),
            Err(ValidationError::MalformedCard(0, "answer"))
        );
    }

    #[test]
    fn test_whitespace_only_fields_are_blank() {
        let deck: Deck = vec![raw("Q", "A", "C"), raw("  ", "A", "C")].into();
        assert_eq!(
            validate(&deck),
            Err(ValidationError::MalformedCard(1, "question"))
        );
    }

    #[test]
    fn test_fail_fast_stops_at_first_problem() {
        let deck: Deck = vec![raw("Q", "A", ""), raw("", "A", "C")].into();
        assert_eq!(
            validate(&deck),
            Err(ValidationError::MalformedCard(0, "category"))
        );
    }

    #[test]
    fn test_validate_all_collects_every_problem() {
        let deck: Deck = vec![raw("Q", "A", ""), raw("Q", "A", "C"), raw("", "", "C")].into();
        assert_eq!(
            validate_all(&deck),
            vec![
                ValidationError::MalformedCard(0, "category"),
                ValidationError::MalformedCard(2, "question"),
            ]
        );
    }

    #[test]
    fn test_valid_deck_passes() {
        let deck: Deck = vec![Flashcard::new("2+2?", "4", "Math").unwrap()].into();
        assert!(validate(&deck).is_ok());
        assert!(validate_all(&deck).is_empty());
    }
}
