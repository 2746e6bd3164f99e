use super::card::{Card, FaceState, PairId};
use super::deck::Deck;

/// Board-level phase of the match engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardPhase {
    AwaitingFirstPick,
    AwaitingSecondPick,
    /// Two cards are face up; input stays locked until resolution completes.
    Resolving,
    Complete,
}

/// Result of selecting a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Locked board, paused board, or a card that is already face up.
    Ignored,
    /// First card of a pair is face up.
    Flipped,
    /// Second card is face up; the board is locked pending [`Board::resolve`].
    PairRevealed,
}

/// Result of adjudicating a revealed pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Match { pair_id: PairId },
    /// The pair stays face up until [`Board::settle_mismatch`].
    NoMatch,
    /// The final pair matched. Carries match semantics as well.
    Complete { pair_id: PairId },
}

impl Resolution {
    pub fn is_match(self) -> bool {
        matches!(self, Resolution::Match { .. } | Resolution::Complete { .. })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub matched_pairs: usize,
    pub total_pairs: usize,
}

/// Cards of one round and the "at most two face up" rule.
#[derive(Debug, Clone)]
pub struct Board {
    cards: Vec<Card>,
    /// Positions of face-up, unmatched cards (at most two)
    revealed: Vec<usize>,
    matched_pairs: usize,
    total_pairs: usize,
    input_locked: bool,
    /// A mismatched pair was adjudicated and waits to be turned back down
    awaiting_revert: bool,
    interactive: bool,
}

impl Board {
    /// Create a board over `cards` in their given order.
    pub fn new(cards: Vec<Card>) -> Self {
        debug_assert!(cards.len() % 2 == 0, "cards come in pairs");
        let total_pairs = cards.len() / 2;
        Board {
            cards,
            revealed: Vec::with_capacity(2),
            matched_pairs: 0,
            total_pairs,
            input_locked: false,
            awaiting_revert: false,
            interactive: true,
        }
    }

    pub fn from_deck(deck: Deck) -> Self {
        Board::new(deck.cards)
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Get the card at a board position
    pub fn card(&self, position: usize) -> Option<&Card> {
        self.cards.get(position)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Positions currently face up and unmatched
    pub fn revealed(&self) -> &[usize] {
        &self.revealed
    }

    pub fn is_locked(&self) -> bool {
        self.input_locked
    }

    pub fn is_interactive(&self) -> bool {
        self.interactive
    }

    pub fn is_complete(&self) -> bool {
        self.total_pairs > 0 && self.matched_pairs == self.total_pairs
    }

    pub fn phase(&self) -> BoardPhase {
        if self.is_complete() {
            BoardPhase::Complete
        } else if self.input_locked {
            BoardPhase::Resolving
        } else if self.revealed.len() == 1 {
            BoardPhase::AwaitingSecondPick
        } else {
            BoardPhase::AwaitingFirstPick
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            matched_pairs: self.matched_pairs,
            total_pairs: self.total_pairs,
        }
    }

    /// Whether a selection at `position` would be accepted right now
    pub fn can_select(&self, position: usize) -> bool {
        self.interactive
            && !self.input_locked
            && self
                .cards
                .get(position)
                .is_some_and(|c| c.face() == FaceState::Hidden)
    }

    /// Turn a card face up.
    pub fn select(&mut self, position: usize) -> Outcome {
        if !self.can_select(position) {
            return Outcome::Ignored;
        }

        self.cards[position].reveal();
        self.revealed.push(position);

        if self.revealed.len() == 2 {
            self.input_locked = true;
            Outcome::PairRevealed
        } else {
            Outcome::Flipped
        }
    }

    /// Compare the two face-up cards. Returns `None` unless a pair is waiting
    /// to be adjudicated.
    pub fn resolve(&mut self) -> Option<Resolution> {
        if !self.input_locked || self.awaiting_revert || self.revealed.len() != 2 {
            return None;
        }

        let (a, b) = (self.revealed[0], self.revealed[1]);
        if self.cards[a].pairs_with(&self.cards[b]) {
            let pair_id = self.cards[a].pair_id();
            self.cards[a].mark_matched();
            self.cards[b].mark_matched();
            self.revealed.clear();
            self.matched_pairs += 1;
            self.input_locked = false;

            if self.is_complete() {
                Some(Resolution::Complete { pair_id })
            } else {
                Some(Resolution::Match { pair_id })
            }
        } else {
            self.awaiting_revert = true;
            Some(Resolution::NoMatch)
        }
    }

    /// Turn a mismatched pair face down and unlock. Returns false if no
    /// mismatch was pending.
    pub fn settle_mismatch(&mut self) -> bool {
        if !self.awaiting_revert {
            return false;
        }
        for &pos in &self.revealed {
            self.cards[pos].hide();
        }
        self.revealed.clear();
        self.awaiting_revert = false;
        self.input_locked = false;
        true
    }

    /// Re-enable selection. Matched cards stay non-selectable.
    pub fn enable_all(&mut self) {
        self.interactive = true;
    }

    /// Block all selection without touching face state.
    pub fn disable_all(&mut self) {
        self.interactive = false;
    }
}
