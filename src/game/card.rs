/// Unique identity of a card within one round.
pub type CardId = usize;

/// Shared by exactly the two cards of a pair.
pub type PairId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FaceState {
    Hidden,
    Revealed,
    Matched,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Card {
    id: CardId,
    pair_id: PairId,
    symbol: String,
    face: FaceState,
}

impl Card {
    /// Create a face-down card
    pub fn new(id: CardId, pair_id: PairId, symbol: impl Into<String>) -> Self {
        Card {
            id,
            pair_id,
            symbol: symbol.into(),
            face: FaceState::Hidden,
        }
    }

    pub fn id(&self) -> CardId {
        self.id
    }

    pub fn pair_id(&self) -> PairId {
        self.pair_id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn face(&self) -> FaceState {
        self.face
    }

    pub fn is_hidden(&self) -> bool {
        self.face == FaceState::Hidden
    }

    pub fn is_matched(&self) -> bool {
        self.face == FaceState::Matched
    }

    /// Whether the two cards form a pair. A card never pairs with itself.
    pub fn pairs_with(&self, other: &Card) -> bool {
        self.pair_id == other.pair_id && self.id != other.id
    }

    // Face transitions are driven by the board only.

    pub(crate) fn reveal(&mut self) {
        debug_assert_eq!(self.face, FaceState::Hidden);
        self.face = FaceState::Revealed;
    }

    pub(crate) fn hide(&mut self) {
        debug_assert_eq!(self.face, FaceState::Revealed);
        self.face = FaceState::Hidden;
    }

    pub(crate) fn mark_matched(&mut self) {
        debug_assert_eq!(self.face, FaceState::Revealed);
        self.face = FaceState::Matched;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_card_is_hidden() {
        let card = Card::new(3, 1, "A");
        assert_eq!(card.face(), FaceState::Hidden);
        assert_eq!(card.symbol(), "A");
        assert_eq!(card.pair_id(), 1);
    }

    #[test]
    fn test_pairs_with() {
        let a = Card::new(0, 7, "x");
        let b = Card::new(1, 7, "x");
        let c = Card::new(2, 8, "y");
        assert!(a.pairs_with(&b));
        assert!(!a.pairs_with(&c));
        assert!(!a.pairs_with(&a.clone()));
    }

    #[test]
    fn test_face_transitions() {
        let mut card = Card::new(0, 0, "x");
        card.reveal();
        assert_eq!(card.face(), FaceState::Revealed);
        card.hide();
        assert!(card.is_hidden());
        card.reveal();
        card.mark_matched();
        assert!(card.is_matched());
    }
}
