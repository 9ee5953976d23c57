use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{Phase, Snapshot};
use crate::metrics::SessionMetrics;

/// What a board cell shows this frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Glyph {
    Empty,
    Food,
    Body(usize),
    Head,
    Fault,
}

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, snapshot: &Snapshot, metrics: &SessionMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        let stats = self.render_stats(chunks[0], snapshot, metrics);
        frame.render_widget(stats, chunks[0]);

        // Center the game grid horizontally
        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if snapshot.phase.is_over() {
            let game_over = self.render_game_over(game_area, snapshot);
            frame.render_widget(game_over, game_area);
        } else {
            let grid = self.render_grid(game_area, snapshot);
            frame.render_widget(grid, game_area);
        }

        let controls = self.render_controls(chunks[2], snapshot);
        frame.render_widget(controls, chunks[2]);
    }

    /// Rasterize the interpolated snapshot onto the cell grid
    fn board(snapshot: &Snapshot) -> Vec<Vec<Glyph>> {
        let dim = snapshot.grid_dimension;
        let mut board = vec![vec![Glyph::Empty; dim]; dim];

        let clamp = |v: f32| (v.round().max(0.0) as usize).min(dim - 1);

        for &(x, y) in &snapshot.food {
            board[clamp(y)][clamp(x)] = Glyph::Food;
        }

        // Tail to head, so segments closer to the head win overlaps.
        for (i, &(x, y)) in snapshot.segments.iter().enumerate().rev() {
            let glyph = if i == 0 { Glyph::Head } else { Glyph::Body(i) };
            board[clamp(y)][clamp(x)] = glyph;
        }

        if let Phase::Dying { at, .. } = snapshot.phase {
            let x = at.x.clamp(0, dim as i32 - 1) as usize;
            let y = at.y.clamp(0, dim as i32 - 1) as usize;
            board[y][x] = Glyph::Fault;
        }

        board
    }

    fn render_grid(&self, _area: Rect, snapshot: &Snapshot) -> Paragraph<'_> {
        let board = Self::board(snapshot);

        // The head points where it is going.
        let head_char = match snapshot.head_direction {
            crate::game::Direction::Up => "▲ ",
            crate::game::Direction::Down => "▼ ",
            crate::game::Direction::Left => "◄ ",
            crate::game::Direction::Right => "► ",
            crate::game::Direction::Idle => "■ ",
        };

        let lines: Vec<Line> = board
            .iter()
            .map(|row| {
                let spans: Vec<Span> = row
                    .iter()
                    .map(|glyph| match glyph {
                        Glyph::Head => Span::styled(
                            head_char,
                            Style::default()
                                .fg(Color::Cyan)
                                .add_modifier(Modifier::BOLD),
                        ),
                        // Alternating shades, like scales
                        Glyph::Body(i) if i % 2 == 0 => {
                            Span::styled("□ ", Style::default().fg(Color::Green))
                        }
                        Glyph::Body(_) => {
                            Span::styled("□ ", Style::default().fg(Color::LightGreen))
                        }
                        Glyph::Food => Span::styled(
                            "O ",
                            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                        ),
                        Glyph::Fault => Span::styled(
                            "X ",
                            Style::default()
                                .fg(Color::White)
                                .bg(Color::Red)
                                .add_modifier(Modifier::BOLD),
                        ),
                        Glyph::Empty => Span::styled(". ", Style::default().fg(Color::DarkGray)),
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();

        let title = match snapshot.phase {
            Phase::NotStarted => " Snake - press Space to start ",
            Phase::Dying { .. } => " Ouch! ",
            _ => " Snake ",
        };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(
        &self,
        _area: Rect,
        snapshot: &Snapshot,
        metrics: &SessionMetrics,
    ) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("Score: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.score.to_string(),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw("    "),
            Span::styled("High: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                snapshot.high_score.to_string(),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Speed: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{}", snapshot.tick_rate),
                Style::default().fg(Color::White),
            ),
            Span::raw("    "),
            Span::styled("Time: ", Style::default().fg(Color::Yellow)),
            Span::styled(metrics.format_time(), Style::default().fg(Color::White)),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, _area: Rect, snapshot: &Snapshot) -> Paragraph<'_> {
        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "GAME OVER",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.score.to_string(),
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("High Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(
                    snapshot.high_score.to_string(),
                    Style::default().fg(Color::White),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Space",
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to play again or ", Style::default().fg(Color::Gray)),
                Span::styled(
                    "Q",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::styled(" to quit", Style::default().fg(Color::Gray)),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self, _area: Rect, snapshot: &Snapshot) -> Paragraph<'_> {
        let start_hint = match snapshot.phase {
            Phase::NotStarted => "Space to start | ",
            Phase::GameOver => "Space to restart | ",
            _ => "",
        };

        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::raw(start_hint),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Cell, CollisionType, Direction};

    fn snapshot() -> Snapshot {
        Snapshot {
            grid_dimension: 6,
            segments: vec![(3.0, 2.0), (2.0, 2.0), (1.0, 2.0)],
            head_direction: Direction::Right,
            food: vec![(5.0, 5.0)],
            score: 0,
            high_score: 0,
            phase: Phase::Running,
            tick_rate: 7,
        }
    }

    #[test]
    fn test_board_places_glyphs() {
        let board = Renderer::board(&snapshot());

        assert_eq!(board[2][3], Glyph::Head);
        assert_eq!(board[2][2], Glyph::Body(1));
        assert_eq!(board[2][1], Glyph::Body(2));
        assert_eq!(board[5][5], Glyph::Food);
        assert_eq!(board[0][0], Glyph::Empty);
    }

    #[test]
    fn test_board_rounds_interpolated_positions() {
        let mut snapshot = snapshot();
        snapshot.segments[0] = (3.6, 2.0);

        let board = Renderer::board(&snapshot);

        assert_eq!(board[2][4], Glyph::Head);
    }

    #[test]
    fn test_board_marks_fault_cell_inside_the_grid() {
        let mut snapshot = snapshot();
        // A wall fault lands one cell out of bounds.
        snapshot.phase = Phase::Dying {
            fault: CollisionType::Wall,
            at: Cell::new(6, 2),
        };

        let board = Renderer::board(&snapshot);

        assert_eq!(board[2][5], Glyph::Fault);
    }
}
