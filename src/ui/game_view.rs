use crate::session::{GameMode, GameState, Session};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::board_widget;

pub fn render(
    frame: &mut Frame,
    session: &Session,
    cursor: usize,
    message: &Option<String>,
    name_entry: Option<&str>,
    high_contrast: bool,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(12),   // Board + side panel
            Constraint::Length(3), // Message
            Constraint::Length(3), // Controls
        ])
        .split(frame.area());

    render_header(frame, session, chunks[0]);

    let main = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(30), Constraint::Length(34)])
        .split(chunks[1]);

    render_board(frame, session, cursor, high_contrast, main[0]);
    render_side_panel(frame, session, main[1]);
    render_message(frame, message, name_entry, chunks[2]);
    render_controls(frame, chunks[3]);
}

fn render_header(frame: &mut Frame, session: &Session, area: Rect) {
    let view = session.view();
    let (status, color) = match view.state {
        GameState::Idle => ("Idle", Color::Gray),
        GameState::Playing => ("Playing", Color::Green),
        GameState::Paused => ("PAUSED", Color::Yellow),
        GameState::Finished => ("Finished", Color::Cyan),
    };

    let mut spans = vec![
        Span::styled(
            format!("{}", view.difficulty),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(status, Style::default().fg(color).add_modifier(Modifier::BOLD)),
    ];
    if let Some(score) = view.score {
        spans.push(Span::raw(format!(
            "  |  Moves: {}  |  Time: {}  |  Score: {}  |  Combo: {}",
            score.move_count,
            format_clock(score.elapsed_seconds),
            score.running_score,
            score.combo_streak
        )));
    }
    if let Some(progress) = view.progress {
        spans.push(Span::raw(format!(
            "  |  Pairs: {}/{}",
            progress.matched_pairs, progress.total_pairs
        )));
    }

    let header = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Memory Match"));

    frame.render_widget(header, area);
}

fn render_board(frame: &mut Frame, session: &Session, cursor: usize, high_contrast: bool, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title("Board");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    match session.board() {
        Some(board) => board_widget::render_grid(
            frame,
            board,
            session.difficulty().columns(),
            cursor,
            high_contrast,
            inner,
        ),
        None => {
            let idle = Paragraph::new("Press R to start a round")
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(idle, inner);
        }
    }
}

fn render_side_panel(frame: &mut Frame, session: &Session, area: Rect) {
    let view = session.view();
    let mut lines = Vec::new();

    if let Some(over) = view.game_over {
        let b = &over.breakdown;
        lines.push(Line::from(Span::styled(
            format!("{}  {}", stars(b.stars), b.total),
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(format!("Matches     {:>8}", b.running_score)));
        lines.push(Line::from(format!("Time bonus  {:>8}", b.time_bonus)));
        lines.push(Line::from(format!("Efficiency  {:>8}", b.efficiency_bonus)));
        lines.push(Line::from(format!("Perfect     {:>8}", b.perfect_bonus)));
        lines.push(Line::from(format!("Combo       {:>8}", b.combo_bonus)));
        lines.push(Line::from(""));
    }

    match view.mode {
        GameMode::Multiplayer => {
            lines.push(Line::from(Span::styled(
                "Players",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let winners = view.game_over.map(|g| g.winners.as_slice()).unwrap_or(&[]);
            for player in view.players {
                let marker = if winners.contains(&player.index()) {
                    "★"
                } else if view.current_turn == Some(player.index()) {
                    "▶"
                } else {
                    " "
                };
                lines.push(Line::from(format!(
                    "{marker} {:<12} {:>3} {:>6}",
                    player.name(),
                    player.matches_won(),
                    player.score()
                )));
            }
        }
        GameMode::SinglePlayer => {
            lines.push(Line::from(Span::styled(
                format!("Top scores ({})", view.difficulty),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            let entries = session.leaderboard().entries(view.difficulty);
            if entries.is_empty() {
                lines.push(Line::from(Span::styled(
                    "no scores yet",
                    Style::default().fg(Color::DarkGray),
                )));
            }
            for (i, entry) in entries.iter().enumerate() {
                lines.push(Line::from(format!(
                    "{:>2}. {:<10} {:>6} {}",
                    i + 1,
                    entry.name,
                    entry.score,
                    entry.date_label
                )));
            }
        }
    }

    let panel = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Stats"));
    frame.render_widget(panel, area);
}

fn render_message(
    frame: &mut Frame,
    message: &Option<String>,
    name_entry: Option<&str>,
    area: Rect,
) {
    let text = match name_entry {
        Some(buffer) => format!("New high score! Enter your name: {buffer}_"),
        None => message.clone().unwrap_or_default(),
    };
    let msg_widget = Paragraph::new(text)
        .style(Style::default().fg(Color::Yellow))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(msg_widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let line = Line::from(
        "←↓↑→/hjkl: Move  |  Enter: Flip  |  P: Pause  |  R: Restart  |  1-4: Difficulty  |  S: Sound  |  Q: Quit",
    );

    let controls = Paragraph::new(line)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Controls"));

    frame.render_widget(controls, area);
}

fn stars(count: u8) -> String {
    (0..3).map(|i| if i < count { '★' } else { '☆' }).collect()
}

fn format_clock(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stars() {
        assert_eq!(stars(0), "☆☆☆");
        assert_eq!(stars(2), "★★☆");
        assert_eq!(stars(3), "★★★");
    }

    #[test]
    fn test_format_clock() {
        assert_eq!(format_clock(0), "0:00");
        assert_eq!(format_clock(75), "1:15");
        assert_eq!(format_clock(600), "10:00");
    }
}
