use rand::seq::SliceRandom;
use rand::Rng;

use super::card::Card;
use crate::error::DeckError;
use crate::symbols::SymbolSource;

/// Cards for one round, plus any degradation applied while building them.
#[derive(Debug, Clone)]
pub struct Deck {
    pub cards: Vec<Card>,
    /// Set when fewer pairs than requested could be dealt
    pub shortfall: Option<DeckError>,
}

impl Deck {
    pub fn pair_count(&self) -> usize {
        self.cards.len() / 2
    }
}

/// Build a shuffled deck of `pair_count` pairs drawn from `source`.
///
/// If the source has fewer distinct symbols than requested, the pair count is
/// clamped to what is available and the shortfall is logged and recorded on
/// the returned deck. Only an empty source or a zero pair count is an error.
pub fn build_deck<R: Rng + ?Sized>(
    pair_count: usize,
    source: &dyn SymbolSource,
    rng: &mut R,
) -> Result<Deck, DeckError> {
    if pair_count == 0 {
        return Err(DeckError::InvalidPairCount);
    }

    let mut symbols = distinct_symbols(source);
    if symbols.is_empty() {
        return Err(DeckError::EmptySymbolSource(source.name().to_string()));
    }

    let shortfall = if symbols.len() < pair_count {
        let err = DeckError::InsufficientSymbols {
            requested: pair_count,
            available: symbols.len(),
        };
        tracing::warn!(source = source.name(), "{err}; clamping pair count");
        Some(err)
    } else {
        None
    };

    // Random subset of the catalog, then a uniform permutation of the cards.
    symbols.shuffle(rng);
    symbols.truncate(pair_count);

    let mut cards = deal_pairs(&symbols);
    cards.shuffle(rng);

    Ok(Deck { cards, shortfall })
}

/// Lay out two cards per symbol in order: pair `i` occupies ids `2i` and `2i + 1`.
pub fn deal_pairs<S: AsRef<str>>(symbols: &[S]) -> Vec<Card> {
    symbols
        .iter()
        .enumerate()
        .flat_map(|(pair_id, symbol)| {
            let symbol = symbol.as_ref();
            [
                Card::new(pair_id * 2, pair_id, symbol),
                Card::new(pair_id * 2 + 1, pair_id, symbol),
            ]
        })
        .collect()
}

fn distinct_symbols(source: &dyn SymbolSource) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    source
        .symbols()
        .into_iter()
        .filter(|s| seen.insert(s.clone()))
        .collect()
}
