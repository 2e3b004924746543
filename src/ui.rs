use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Tabs, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::{App, NoticeKind},
    celebration::Celebration,
    session::Status,
    share::{self, GAME_TITLE},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;
const GUESS_BOX_WIDTH: u16 = 44;

/// Colors for one theme
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub dim: Color,
    pub accent: Color,
    pub hit: Color,
    pub hit_bg: Color,
    pub miss: Color,
    pub miss_bg: Color,
}

impl Palette {
    pub fn for_theme(dark: bool) -> Self {
        if dark {
            Self {
                bg: Color::Rgb(24, 24, 24),
                fg: Color::Rgb(230, 230, 230),
                dim: Color::DarkGray,
                accent: Color::Cyan,
                hit: Color::Rgb(0x88, 0xff, 0x88),
                hit_bg: Color::Rgb(0x22, 0x36, 0x22),
                miss: Color::Rgb(0xff, 0x88, 0x88),
                miss_bg: Color::Rgb(0x66, 0x23, 0x23),
            }
        } else {
            Self {
                bg: Color::Rgb(250, 250, 250),
                fg: Color::Black,
                dim: Color::Gray,
                accent: Color::Blue,
                hit: Color::Green,
                hit_bg: Color::Rgb(0xcc, 0xff, 0xcc),
                miss: Color::Red,
                miss_bg: Color::Rgb(0xff, 0xcc, 0xcc),
            }
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let palette = Palette::for_theme(self.theme.dark);
        let base = Style::default().bg(palette.bg).fg(palette.fg);
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let dim = Style::default().fg(palette.dim);

        buf.set_style(area, base);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1), // title
                Constraint::Length(1), // puzzle tabs
                Constraint::Length(1), // show - date
                Constraint::Length(1), // padding
                Constraint::Min(3),    // game
                Constraint::Length(1), // notice
                Constraint::Length(1), // legend
            ])
            .split(area);

        let header = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(14),
                Constraint::Min(0),
                Constraint::Length(14),
            ])
            .split(chunks[0]);

        Paragraph::new(Span::styled(GAME_TITLE, bold.fg(palette.accent)))
            .alignment(Alignment::Center)
            .render(header[1], buf);

        let theme_hint = if self.theme.dark { "light mode" } else { "dark mode" };
        Paragraph::new(Span::styled(format!("^t {theme_hint}"), dim))
            .alignment(Alignment::Right)
            .render(header[2], buf);

        let engine = &self.engine;
        let ids: Vec<String> = engine.catalog().ids().map(str::to_uppercase).collect();
        let selected = engine
            .catalog()
            .ids()
            .position(|id| id == engine.puzzle().id)
            .unwrap_or(0);
        let tabs_width = ids
            .iter()
            .map(|t| u16::try_from(t.width()).unwrap_or(u16::MAX).saturating_add(3))
            .fold(0u16, |acc, w| acc.saturating_add(w));
        Tabs::new(ids)
            .select(selected)
            .style(dim)
            .highlight_style(bold.fg(palette.accent).add_modifier(Modifier::UNDERLINED))
            .render(centered(chunks[1], tabs_width), buf);

        let puzzle = engine.puzzle();
        Paragraph::new(Span::styled(
            format!("{} - {}", puzzle.show, puzzle.date),
            Style::default().add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[2], buf);

        match engine.status() {
            Status::NotStarted => render_start_screen(chunks[4], buf, &palette),
            _ => render_game(self, chunks[4], buf, &palette),
        }

        if let Some(notice) = &self.notice {
            let color = match notice.kind {
                NoticeKind::Info => palette.accent,
                NoticeKind::Warning => palette.miss,
            };
            Paragraph::new(Span::styled(notice.text.as_str(), Style::default().fg(color)))
                .alignment(Alignment::Center)
                .render(chunks[5], buf);
        }

        let legend = match engine.status() {
            Status::NotStarted => "(enter) start / (tab) next puzzle / (esc)ape",
            Status::InProgress => "(enter) guess / ^r replay clip / (tab) next puzzle / (esc)ape",
            Status::Won | Status::Lost => {
                "(c)opy result / (t)weet / (n)ext puzzle / ^r replay / (esc)ape"
            }
        };
        Paragraph::new(Span::styled(
            legend,
            dim.add_modifier(Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

        if self.celebration.is_active {
            render_celebration(&self.celebration, area, buf);
        }
    }
}

fn centered(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn render_start_screen(area: Rect, buf: &mut Buffer, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(40),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);

    Paragraph::new(Span::styled(
        "Start Game",
        Style::default()
            .fg(palette.accent)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL))
    .render(centered(chunks[1], 20), buf);
}

fn render_game(app: &App, area: Rect, buf: &mut Buffer, palette: &Palette) {
    let engine = &app.engine;
    let state = engine.state();
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let guess_box_lines = if state.status == Status::Lost { 0 } else { 3 };
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),               // clip progress
            Constraint::Length(1),               // padding
            Constraint::Length(guess_box_lines), // active or winning guess
            Constraint::Min(1),                  // incorrect guesses
            Constraint::Length(1),               // outcome message
            Constraint::Length(1),               // share preview
        ])
        .split(area);

    // clip progress pips
    let mut pips = vec![Span::styled(
        format!("Clip {}/{}  ", state.current_clip, state.clip_count),
        bold,
    )];
    for clip in 1..=state.clip_count {
        let (symbol, style) = if clip == state.current_clip {
            ("●", Style::default().fg(palette.accent))
        } else if clip < state.current_clip {
            ("●", Style::default().fg(palette.dim))
        } else {
            ("○", Style::default().fg(palette.dim))
        };
        pips.push(Span::styled(format!("{symbol} "), style));
    }
    if state.status == Status::InProgress {
        pips.push(Span::styled(
            format!(" {} left", engine.attempts_remaining()),
            Style::default().fg(palette.dim),
        ));
    }
    Paragraph::new(Line::from(pips))
        .alignment(Alignment::Center)
        .render(chunks[0], buf);

    let box_area = centered(chunks[2], GUESS_BOX_WIDTH);
    match state.status {
        Status::Won => {
            Paragraph::new(Span::styled(
                engine.puzzle().answer.as_str(),
                bold.fg(palette.hit),
            ))
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(palette.hit)),
            )
            .style(Style::default().bg(palette.hit_bg))
            .render(box_area, buf);
        }
        Status::InProgress => {
            let line = if state.pending_guess.is_empty() {
                Line::from(vec![
                    Span::styled("█", Style::default().fg(palette.dim)),
                    Span::styled(
                        "Guess the Guest",
                        Style::default()
                            .fg(palette.dim)
                            .add_modifier(Modifier::ITALIC),
                    ),
                ])
            } else {
                Line::from(vec![
                    Span::raw(state.pending_guess.as_str()),
                    Span::styled("█", Style::default().fg(palette.accent)),
                ])
            };
            Paragraph::new(line)
                .block(Block::default().borders(Borders::ALL))
                .render(box_area, buf);
        }
        Status::Lost | Status::NotStarted => {}
    }

    // newest miss first
    let misses: Vec<Line> = state
        .incorrect_guesses
        .iter()
        .rev()
        .map(|g| {
            Line::from(Span::styled(
                format!(" ✗ {g} "),
                Style::default().fg(palette.miss).bg(palette.miss_bg),
            ))
        })
        .collect();
    Paragraph::new(misses)
        .alignment(Alignment::Center)
        .render(chunks[3], buf);

    let message = match state.status {
        Status::Won => Some(Span::styled(
            "Congratulations, you got it right!",
            bold.fg(palette.hit),
        )),
        Status::Lost => Some(Span::styled(
            format!("Game Over: You lost. It was {}.", engine.puzzle().answer),
            bold.fg(palette.miss),
        )),
        _ => None,
    };
    if let Some(message) = message {
        Paragraph::new(message)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(chunks[4], buf);
    }

    if state.is_terminal() {
        let markers: String = engine.markers().into_iter().map(share::marker).collect();
        Paragraph::new(Span::raw(markers))
            .alignment(Alignment::Center)
            .render(chunks[5], buf);
    }
}

/// Render celebration particles on top of the game screen
fn render_celebration(celebration: &Celebration, area: Rect, buf: &mut Buffer) {
    let colors = [
        Color::Yellow,
        Color::Magenta,
        Color::Cyan,
        Color::Green,
        Color::Red,
        Color::Blue,
        Color::LightYellow,
    ];

    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let (x, y) = (particle.x as u16, particle.y as u16);
        if x >= area.width || y >= area.height {
            continue;
        }

        let color = colors[particle.color_index % colors.len()];
        let fade = 1.0 - particle.age / particle.max_age;
        let style = if particle.is_letter() || fade > 0.6 {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        } else if fade > 0.3 {
            Style::default().fg(color)
        } else {
            Style::default().fg(color).add_modifier(Modifier::DIM)
        };

        if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
            cell.set_symbol(&particle.symbol.to_string());
            cell.set_style(style);
        }
    }
}
