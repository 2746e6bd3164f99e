//! Terminal UI: the card grid with a keyboard cursor, score header, side
//! panel with the breakdown and standings, and the high-score name prompt.

mod app;
pub mod board_widget;
mod game_view;

pub use app::App;
