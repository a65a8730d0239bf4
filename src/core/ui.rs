/// Board renderer: a pure projection of server state into ratatui text.
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::core::state::{GameState, Session};

const CELL_WIDTH: usize = 7;

/// Per-value tile styling, the terminal equivalent of the web client
/// tagging each tile with its value for CSS.
pub fn tile_style(value: u32) -> Style {
    let style = Style::default();
    match value {
        0 => style.fg(Color::DarkGray),
        2 => style.fg(Color::Gray),
        4 => style.fg(Color::White),
        8 => style.fg(Color::LightYellow),
        16 => style.fg(Color::Yellow),
        32 => style.fg(Color::LightRed),
        64 => style.fg(Color::Red),
        128 => style.fg(Color::LightMagenta),
        256 => style.fg(Color::Magenta),
        512 => style.fg(Color::LightCyan),
        1024 => style.fg(Color::Cyan),
        2048 => style.fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        _ => style.fg(Color::Green).add_modifier(Modifier::BOLD),
    }
}

fn cell_span(value: u32) -> Span<'static> {
    let text = if value > 0 {
        format!("{:^width$}", value, width = CELL_WIDTH)
    } else {
        " ".repeat(CELL_WIDTH)
    };
    Span::styled(text, tile_style(value))
}

/// One line per board row, one fixed-width span per cell, row-major.
pub fn board_lines(state: &GameState) -> Vec<Line<'static>> {
    state
        .board
        .iter()
        .map(|row| Line::from(row.iter().map(|&v| cell_span(v)).collect::<Vec<_>>()))
        .collect()
}

pub fn score_line(state: &GameState) -> Line<'static> {
    let mut spans = vec![
        Span::raw("Score: "),
        Span::styled(state.score.to_string(), Style::default().add_modifier(Modifier::BOLD)),
    ];
    if state.won {
        spans.push(Span::styled(
            "  2048!",
            Style::default().fg(Color::LightGreen).add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

/// The overlay is purely a rendering flag from the server.
pub fn show_overlay(state: &GameState) -> bool {
    state.game_over
}

pub fn overlay_text(state: &GameState) -> &'static str {
    if state.won { "You win!" } else { "Game over" }
}

/// Draw the whole frame: score, board, key hints, plus the game-over
/// overlay or a blocking error modal when one is up.
pub fn render(frame: &mut Frame, session: &Session, error: Option<&str>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    match session.latest() {
        Some(state) => {
            frame.render_widget(
                Paragraph::new(score_line(state)).alignment(Alignment::Center),
                chunks[0],
            );

            let board = Paragraph::new(board_lines(state))
                .block(Block::default().borders(Borders::ALL).title(" 2048 "))
                .alignment(Alignment::Center);
            frame.render_widget(board, chunks[1]);

            if show_overlay(state) {
                let area = centered_rect(chunks[1], 40, 3);
                frame.render_widget(Clear, area);
                let overlay = Paragraph::new(format!("{} - press n for a new game", overlay_text(state)))
                    .block(Block::default().borders(Borders::ALL))
                    .alignment(Alignment::Center)
                    .style(Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD));
                frame.render_widget(overlay, area);
            }
        }
        None => {
            let waiting = Paragraph::new("Starting a new game...")
                .block(Block::default().borders(Borders::ALL).title(" 2048 "))
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::Gray));
            frame.render_widget(waiting, chunks[1]);
        }
    }

    frame.render_widget(
        Paragraph::new("arrows: move | n: new game | q: quit")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray)),
        chunks[2],
    );

    if let Some(message) = error {
        let area = centered_rect(frame.area(), 60, 5);
        frame.render_widget(Clear, area);
        let modal = Paragraph::new(format!("{message}\n\npress n to retry, q to quit"))
            .block(Block::default().borders(Borders::ALL).title(" Error "))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red));
        frame.render_widget(modal, area);
    }
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}
