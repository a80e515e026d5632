//! Flashcard sequencer state machine.
//!
//! States: before-first-card, showing card `n` (hidden or revealed), and the
//! one-shot exhausted state reached by advancing past the last card.

use crate::model::definition::Definition;
use log::{info, warn};
use rand::seq::SliceRandom;
use rand::Rng;

/// Outcome of [`FlashcardSequencer::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashcardStep<'deck> {
    /// A new card is current; show its phrase, keep the meaning hidden.
    Card(&'deck Definition),
    /// No cards remain; the caller should end the session.
    Exhausted,
}

/// Randomized, non-repeating walk over a definition snapshot.
#[derive(Debug, Clone)]
pub struct FlashcardSequencer {
    deck: Vec<Definition>,
    /// `None` before the first `advance`.
    position: Option<usize>,
    revealed: bool,
    exhausted: bool,
}

impl FlashcardSequencer {
    /// Snapshots `definitions` and shuffles them once with `rng`.
    pub fn new<R: Rng + ?Sized>(definitions: Vec<Definition>, rng: &mut R) -> Self {
        let mut deck = definitions;
        deck.shuffle(rng);
        info!(
            "event=flashcards_start module=flashcards status=ok cards={}",
            deck.len()
        );
        Self {
            deck,
            position: None,
            revealed: false,
            exhausted: false,
        }
    }

    /// Moves to the next card.
    ///
    /// Advancing past the last card enters the exhausted state; further
    /// calls keep returning `Exhausted`.
    pub fn advance(&mut self) -> FlashcardStep<'_> {
        if self.exhausted {
            warn!("event=flashcards_advance module=flashcards status=ignored reason=exhausted");
            return FlashcardStep::Exhausted;
        }

        let next = self.position.map_or(0, |position| position + 1);
        self.revealed = false;
        if next >= self.deck.len() {
            self.position = Some(self.deck.len());
            self.exhausted = true;
            info!(
                "event=flashcards_end module=flashcards status=ok cards={}",
                self.deck.len()
            );
            return FlashcardStep::Exhausted;
        }

        self.position = Some(next);
        FlashcardStep::Card(&self.deck[next])
    }

    /// Reveals the current card's meaning.
    ///
    /// Returns `None` without changing state when no card is current.
    pub fn reveal(&mut self) -> Option<&str> {
        let index = self.current_index()?;
        self.revealed = true;
        Some(self.deck[index].meaning.as_str())
    }

    /// Returns the card currently shown, if any.
    pub fn current(&self) -> Option<&Definition> {
        self.current_index().map(|index| &self.deck[index])
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Zero-based index of the current card; `None` before the first card.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    /// Cards not yet shown.
    pub fn remaining(&self) -> usize {
        match self.position {
            None => self.deck.len(),
            Some(position) => self.deck.len().saturating_sub(position + 1),
        }
    }

    fn current_index(&self) -> Option<usize> {
        self.position.filter(|position| *position < self.deck.len())
    }
}

#[cfg(test)]
mod tests {
    use super::{FlashcardSequencer, FlashcardStep};
    use crate::model::definition::Definition;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn deck(size: usize) -> Vec<Definition> {
        (0..size)
            .map(|index| Definition::new(format!("p{index}"), format!("m{index}")))
            .collect()
    }

    #[test]
    fn reveal_before_first_advance_is_noop() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sequencer = FlashcardSequencer::new(deck(2), &mut rng);
        assert_eq!(sequencer.reveal(), None);
        assert!(!sequencer.is_revealed());
    }

    #[test]
    fn advance_resets_revealed_flag() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut sequencer = FlashcardSequencer::new(deck(2), &mut rng);
        sequencer.advance();
        assert!(sequencer.reveal().is_some());
        assert!(sequencer.is_revealed());
        sequencer.advance();
        assert!(!sequencer.is_revealed());
    }

    #[test]
    fn empty_deck_is_exhausted_on_first_advance() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut sequencer = FlashcardSequencer::new(Vec::new(), &mut rng);
        assert_eq!(sequencer.advance(), FlashcardStep::Exhausted);
        assert!(sequencer.is_exhausted());
        assert_eq!(sequencer.reveal(), None);
    }

    #[test]
    fn remaining_counts_down() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut sequencer = FlashcardSequencer::new(deck(3), &mut rng);
        assert_eq!(sequencer.remaining(), 3);
        sequencer.advance();
        assert_eq!(sequencer.remaining(), 2);
        sequencer.advance();
        sequencer.advance();
        assert_eq!(sequencer.remaining(), 0);
        sequencer.advance();
        assert_eq!(sequencer.remaining(), 0);
    }
}
