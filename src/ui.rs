//! Layout and drawing: playfield, next preview, stats, and the idle / pause / game-over overlays.
//!
//! The playfield is painted from a [`Canvas`] that only changes through the session's
//! full-board read and its redraw deltas, the same way a retained-mode renderer would.

use crate::theme::Theme;
use blockfall::{Event, HEIGHT, Kind, Phase, Preview, Redraw, Session, WIDTH};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Widget};
use std::time::Instant;
use tachyonfx::{Duration as TfxDuration, Effect, EffectRenderer, Interpolation, fx};

/// Each board cell is two terminal columns wide so blocks look square.
const CELL_WIDTH: u16 = 2;
const SIDEBAR_WIDTH: u16 = 24;
/// Next preview box side, in cells.
const PREVIEW_CELLS: u16 = 4;
/// Duration of the line-clear flash in ms.
const LINE_CLEAR_FLASH_MS: u32 = 250;

/// Mirror of what is on screen, kept in sync through session events.
#[derive(Debug, Clone)]
pub struct Canvas {
    cells: [[Option<Kind>; WIDTH]; HEIGHT],
}

impl Default for Canvas {
    fn default() -> Self {
        Self {
            cells: [[None; WIDTH]; HEIGHT],
        }
    }
}

impl Canvas {
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<Kind> {
        self.cells.get(row).and_then(|r| r.get(col)).copied().flatten()
    }

    /// Repaint everything from the session's full read.
    pub fn resync(&mut self, session: &Session) {
        self.cells = [[None; WIDTH]; HEIGHT];
        for (r, c, kind) in session.painted_cells() {
            self.cells[r][c] = Some(kind);
        }
    }

    /// Unpaint the old footprint, then paint the new one.
    pub fn apply(&mut self, redraw: &Redraw) {
        for &(r, c) in &redraw.cleared {
            if let Some(cell) = self.cells.get_mut(r).and_then(|row| row.get_mut(c)) {
                *cell = None;
            }
        }
        for &(r, c, kind) in &redraw.painted {
            if let Some(cell) = self.cells.get_mut(r).and_then(|row| row.get_mut(c)) {
                *cell = Some(kind);
            }
        }
    }

    /// Fold one session event in. Returns true if the canvas changed.
    pub fn update(&mut self, event: &Event, session: &Session) -> bool {
        match event {
            Event::Redraw(r) => {
                self.apply(r);
                !r.is_empty()
            }
            Event::Resync => {
                self.resync(session);
                true
            }
            _ => false,
        }
    }
}

/// Score and level as last announced by the session.
#[derive(Debug, Clone, Copy, Default)]
pub struct Hud {
    pub score: u32,
    pub level: u32,
    pub final_score: Option<u32>,
}

/// Everything `draw` needs besides the frame.
pub struct View<'a> {
    pub session: &'a Session,
    pub canvas: &'a Canvas,
    pub hud: &'a Hud,
    pub theme: &'a Theme,
}

/// Playfield outer size in terminal cells (border included).
fn playfield_size() -> (u16, u16) {
    (WIDTH as u16 * CELL_WIDTH + 2, HEIGHT as u16 + 2)
}

/// Playfield and sidebar rects, centred in `area`.
fn split(area: Rect) -> (Rect, Rect) {
    let (pw, ph) = playfield_size();
    let total_w = pw + SIDEBAR_WIDTH;
    let horiz = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(total_w),
            Constraint::Fill(1),
        ])
        .split(area);
    let vert = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(ph),
            Constraint::Fill(1),
        ])
        .split(horiz[1]);
    let inner = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(pw), Constraint::Length(SIDEBAR_WIDTH)])
        .split(vert[1]);
    (inner[0], inner[1])
}

/// Board rect without its border; where the flash effect runs.
pub fn board_rect(area: Rect) -> Rect {
    let (playfield, _) = split(area);
    Block::default().borders(Borders::ALL).inner(playfield)
}

/// Draw the game and whichever overlay the phase calls for.
pub fn draw(frame: &mut Frame, view: &View<'_>) {
    let area = frame.area();
    let (playfield, sidebar) = split(area);
    draw_playfield(frame, view, playfield);
    draw_sidebar(frame, view, sidebar);
    match view.session.phase() {
        Phase::Idle => draw_overlay(frame, view.theme, area, " Blockfall ", &["S start    Q quit"]),
        Phase::Paused => draw_overlay(frame, view.theme, area, " Paused ", &["P resume    Q quit"]),
        Phase::GameOver => {
            let score = format!("Final score: {}", view.hud.final_score.unwrap_or(view.hud.score));
            draw_overlay(
                frame,
                view.theme,
                area,
                " Game Over ",
                &[score.as_str(), "R restart    Q quit"],
            );
        }
        Phase::Playing => {}
    }
}

/// Run the line-clear flash over the board (TachyonFX: fade from the flash colour back to normal).
pub fn render_flash(
    frame: &mut Frame,
    theme: &Theme,
    effect: &mut Option<Effect>,
    last_process: &mut Option<Instant>,
    now: Instant,
) {
    let rect = board_rect(frame.area());
    let delta = last_process
        .map(|t| now.saturating_duration_since(t))
        .unwrap_or(std::time::Duration::ZERO);
    let delta_ms = delta.as_millis().min(u32::MAX as u128) as u32;
    *last_process = Some(now);
    let effect = effect.get_or_insert_with(|| {
        fx::fade_from(theme.flash, theme.flash, (LINE_CLEAR_FLASH_MS, Interpolation::Linear))
            .with_area(rect)
    });
    frame.render_effect(effect, rect, TfxDuration::from_millis(delta_ms));
}

fn draw_playfield(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let theme = view.theme;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
        .title(Span::styled(" Blockfall ", Style::default().fg(theme.title)));
    let inner = block.inner(area);
    block.render(area, frame.buffer_mut());

    let buf = frame.buffer_mut();
    for r in 0..HEIGHT {
        for c in 0..WIDTH {
            let x = inner.x + c as u16 * CELL_WIDTH;
            let y = inner.y + r as u16;
            if x + CELL_WIDTH > inner.x + inner.width || y >= inner.y + inner.height {
                continue;
            }
            let (symbol, style) = match view.canvas.get(r, c) {
                Some(kind) => {
                    let color = theme.piece_color(kind);
                    ("██", Style::default().fg(color).bg(theme.bg))
                }
                None => (" ·", Style::default().fg(theme.inactive_fg).bg(theme.bg)),
            };
            buf.set_string(x, y, symbol, style);
        }
    }
}

fn sidebar_block(theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.div_line).bg(theme.bg))
}

fn draw_sidebar(frame: &mut Frame, view: &View<'_>, area: Rect) {
    let theme = view.theme;
    let title_style = Style::default().fg(theme.title);
    let fg_style = Style::default().fg(theme.main_fg);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(PREVIEW_CELLS + 3), // Next (border + title + preview)
            Constraint::Length(1),
            Constraint::Length(7), // Stats
            Constraint::Length(1),
            Constraint::Min(0), // Controls
        ])
        .split(area);

    // --- Next ---
    let next_block = sidebar_block(theme);
    let next_inner = next_block.inner(chunks[0]);
    next_block.render(chunks[0], frame.buffer_mut());
    let next_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(PREVIEW_CELLS)])
        .split(next_inner);
    let preview = view.session.preview();
    let next_title = Line::from(vec![
        Span::styled("Next ", title_style),
        Span::styled(preview.kind.glyph().to_string(), fg_style),
    ]);
    Paragraph::new(next_title).render(next_layout[0], frame.buffer_mut());
    draw_preview(frame, theme, next_layout[1], &preview);

    // --- Stats ---
    let stats_block = sidebar_block(theme);
    let stats_inner = stats_block.inner(chunks[2]);
    stats_block.render(chunks[2], frame.buffer_mut());
    let state = match view.session.phase() {
        Phase::Idle => "Ready",
        Phase::Playing => "Playing",
        Phase::Paused => "Paused",
        Phase::GameOver => "Game over",
    };
    let stat = |label: &'static str, value: String| {
        Line::from(vec![
            Span::styled(label, title_style),
            Span::styled(value, fg_style),
        ])
    };
    let lines = vec![
        stat("Score: ", view.hud.score.to_string()),
        stat("Level: ", view.hud.level.to_string()),
        stat("Lines: ", view.session.lines().to_string()),
        stat("Speed: ", format!("{} ms", view.session.scheduler().interval().as_millis())),
        stat("State: ", state.to_string()),
    ];
    Paragraph::new(lines).render(stats_inner, frame.buffer_mut());

    // --- Controls ---
    let help = vec![
        Line::from(Span::styled("←/→ h/l  move", fg_style)),
        Line::from(Span::styled("↑ k      rotate", fg_style)),
        Line::from(Span::styled("↓ j      soft drop", fg_style)),
        Line::from(Span::styled("Space    hard drop", fg_style)),
        Line::from(Span::styled("P pause  R restart", fg_style)),
        Line::from(Span::styled("Mouse: drag / tap", Style::default().fg(theme.inactive_fg))),
    ];
    Paragraph::new(help).render(chunks[4], frame.buffer_mut());
}

/// Next piece centred in a 4×4 box, offset `(4 - size) / 2` on both axes.
fn draw_preview(frame: &mut Frame, theme: &Theme, area: Rect, preview: &Preview) {
    let color = theme.piece_color(preview.kind);
    let left = area.x + area.width.saturating_sub(PREVIEW_CELLS * CELL_WIDTH) / 2;
    let buf = frame.buffer_mut();
    for (r, c) in preview.cells() {
        let x = left + c as u16 * CELL_WIDTH;
        let y = area.y + r as u16;
        if x + CELL_WIDTH <= area.x + area.width && y < area.y + area.height {
            buf.set_string(x, y, "██", Style::default().fg(color));
        }
    }
}

fn draw_overlay(frame: &mut Frame, theme: &Theme, area: Rect, title: &str, body: &[&str]) {
    let popup_w = 30u16;
    let popup_h = body.len() as u16 + 4;
    let popup = Rect {
        x: area.x + area.width.saturating_sub(popup_w) / 2,
        y: area.y + area.height.saturating_sub(popup_h) / 2,
        width: popup_w.min(area.width),
        height: popup_h.min(area.height),
    };
    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            title.to_string(),
            Style::default().fg(theme.bg).bg(theme.title).bold(),
        )),
    ];
    let body_style = Style::default().fg(theme.main_fg);
    lines.extend(body.iter().map(|l| Line::from(Span::styled((*l).to_string(), body_style))));
    let p = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.div_line).bg(theme.bg)),
    );
    ratatui::widgets::Clear.render(popup, frame.buffer_mut());
    p.render(popup, frame.buffer_mut());
}
