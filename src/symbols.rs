//! Symbol catalogs: the faces printed on cards.

use std::fmt;
use std::str::FromStr;

/// Supplies distinct card faces on request.
pub trait SymbolSource {
    /// Catalog name, used in log messages
    fn name(&self) -> &str;

    /// All distinct symbols this source can provide
    fn symbols(&self) -> Vec<String>;

    fn available(&self) -> usize {
        self.symbols().len()
    }
}

const EMOJI: &[&str] = &[
    "🍎", "🍌", "🍇", "🍓", "🍒", "🍑", "🍍", "🥝", "🥥", "🍋", "🍉", "🥕", "🌽", "🍄", "🌶",
    "🥑", "🍆", "🥦", "🍐", "🍊", "🥭", "🫐", "🥨", "🧀",
];

const ANIMALS: &[&str] = &[
    "🐶", "🐱", "🐭", "🐹", "🐰", "🦊", "🐻", "🐼", "🐨", "🐯", "🦁", "🐮", "🐷", "🐸", "🐵",
    "🐔", "🐧", "🐦", "🦆", "🦉",
];

const SHAPES: &[&str] = &["●", "■", "▲", "◆", "★", "♥", "♣", "♠", "◐", "✚", "⬟", "☾"];

const LETTERS: &[&str] = &[
    "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M", "N", "O", "P", "Q", "R",
    "S", "T", "U", "V", "W", "X", "Y", "Z",
];

/// Built-in themes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Emoji,
    Animals,
    Shapes,
    Letters,
}

impl Theme {
    pub const ALL: [Theme; 4] = [Theme::Emoji, Theme::Animals, Theme::Shapes, Theme::Letters];

    pub fn tag(self) -> &'static str {
        match self {
            Theme::Emoji => "emoji",
            Theme::Animals => "animals",
            Theme::Shapes => "shapes",
            Theme::Letters => "letters",
        }
    }

    fn table(self) -> &'static [&'static str] {
        match self {
            Theme::Emoji => EMOJI,
            Theme::Animals => ANIMALS,
            Theme::Shapes => SHAPES,
            Theme::Letters => LETTERS,
        }
    }

    /// Resolve a theme tag, falling back to the default theme for unknown tags.
    pub fn from_tag_or_default(tag: &str) -> Theme {
        tag.parse().unwrap_or_else(|_| {
            tracing::warn!(theme = tag, "unknown theme, using '{}'", Theme::default());
            Theme::default()
        })
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Theme::ALL
            .into_iter()
            .find(|t| t.tag() == lower)
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

impl SymbolSource for Theme {
    fn name(&self) -> &str {
        self.tag()
    }

    fn symbols(&self) -> Vec<String> {
        self.table().iter().map(|s| s.to_string()).collect()
    }

    fn available(&self) -> usize {
        self.table().len()
    }
}

/// An explicit list of symbols.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedSymbols {
    name: String,
    symbols: Vec<String>,
}

impl FixedSymbols {
    pub fn new(name: impl Into<String>, symbols: Vec<String>) -> Self {
        FixedSymbols {
            name: name.into(),
            symbols,
        }
    }

    /// `count` symbols named `S0`, `S1`, ...
    pub fn numbered(count: usize) -> Self {
        FixedSymbols::new("numbered", (0..count).map(|i| format!("S{i}")).collect())
    }
}

impl SymbolSource for FixedSymbols {
    fn name(&self) -> &str {
        &self.name
    }

    fn symbols(&self) -> Vec<String> {
        self.symbols.clone()
    }
}
