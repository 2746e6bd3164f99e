pub const DEFAULT_PLAYER_NAME: &str = "Player";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    index: usize,
    name: String,
    score: u64,
    matches_won: u32,
}

impl Player {
    /// Create a player, trimming and truncating the externally supplied name.
    pub fn new(index: usize, name: &str, max_name_len: usize) -> Self {
        Player {
            index,
            name: sanitize_name(name, max_name_len),
            score: 0,
            matches_won: 0,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Get player name for display
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn matches_won(&self) -> u32 {
        self.matches_won
    }

    /// Credit one matched pair worth `points`
    pub fn credit_match(&mut self, points: u64) {
        self.matches_won += 1;
        self.score += points;
    }

    /// Clear per-round totals, keeping identity
    pub fn reset(&mut self) {
        self.score = 0;
        self.matches_won = 0;
    }
}

/// Trim whitespace and cap the name at `max_len` characters. Blank names
/// fall back to [`DEFAULT_PLAYER_NAME`].
pub fn sanitize_name(name: &str, max_len: usize) -> String {
    let trimmed: String = name.trim().chars().take(max_len).collect();
    let trimmed = trimmed.trim_end();
    if trimmed.is_empty() {
        DEFAULT_PLAYER_NAME.chars().take(max_len.max(1)).collect()
    } else {
        trimmed.to_string()
    }
}

/// Indices of the players with the most matches won, ties broken by score.
/// Every player still tied after the tie-break is returned.
pub fn winners(players: &[Player]) -> Vec<usize> {
    let best = players
        .iter()
        .map(|p| (p.matches_won, p.score))
        .max();
    match best {
        Some(best) => players
            .iter()
            .filter(|p| (p.matches_won, p.score) == best)
            .map(|p| p.index)
            .collect(),
        None => Vec::new(),
    }
}
