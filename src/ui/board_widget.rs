use crate::game::{Board, FaceState};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

const CELL_WIDTH: usize = 6;
const HIDDEN_FACE: &str = "░░";

/// Render the card grid, `columns` cards per row, highlighting the cursor.
pub fn render_grid(
    frame: &mut Frame,
    board: &Board,
    columns: usize,
    cursor: usize,
    high_contrast: bool,
    area: Rect,
) {
    let columns = columns.max(1);
    let mut lines = vec![Line::from("")];

    for (row, chunk) in board.cards().chunks(columns).enumerate() {
        let mut spans = Vec::with_capacity(chunk.len());
        for (col, card) in chunk.iter().enumerate() {
            let position = row * columns + col;
            let (face, mut style) = match card.face() {
                FaceState::Hidden => (HIDDEN_FACE, hidden_style(high_contrast)),
                FaceState::Revealed => (
                    card.symbol(),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ),
                FaceState::Matched => (card.symbol(), matched_style(high_contrast)),
            };
            if position == cursor {
                style = style.add_modifier(Modifier::REVERSED);
            }
            spans.push(Span::styled(pad(face), style));
        }
        lines.push(Line::from(spans));
        lines.push(Line::from(""));
    }

    let widget = Paragraph::new(lines).alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(widget, area);
}

fn hidden_style(high_contrast: bool) -> Style {
    if high_contrast {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    }
}

fn matched_style(high_contrast: bool) -> Style {
    if high_contrast {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
    }
}

/// Center a face in a fixed-width cell.
fn pad(face: &str) -> String {
    let width = display_width(face);
    let left = CELL_WIDTH.saturating_sub(width) / 2;
    let right = CELL_WIDTH.saturating_sub(width + left);
    format!("{}{}{}", " ".repeat(left), face, " ".repeat(right))
}

/// Rough terminal width: pictographs take two columns.
fn display_width(s: &str) -> usize {
    s.chars()
        .map(|c| match c as u32 {
            0x1F000.. => 2,
            0xFE00..=0xFE0F | 0x200D => 0,
            _ => 1,
        })
        .sum()
}
