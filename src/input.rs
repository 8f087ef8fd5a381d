//! Key bindings (normal and vim-style) and mouse drags treated as touch swipes.

use blockfall::Intent;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};

/// Columns a drag must cover before it counts as one sideways move.
const SWIPE_COLS: u16 = 2;
/// Rows a drag must cover downwards before it counts as one soft drop.
const SWIPE_ROWS: u16 = 1;

/// Action from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Game(Intent),
    Quit,
    None,
}

/// Map key event to game action. Supports both normal (arrows, space) and vim (hjkl) keys.
pub fn key_to_action(key: KeyEvent) -> Action {
    let KeyEvent { code, modifiers, .. } = key;
    let no_mod = modifiers.is_empty() || modifiers == KeyModifiers::SHIFT;
    if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
        return Action::Quit;
    }
    if !no_mod {
        return Action::None;
    }
    let intent = match code {
        KeyCode::Char('q') | KeyCode::Esc => return Action::Quit,
        KeyCode::Left | KeyCode::Char('h') => Intent::MoveLeft,
        KeyCode::Right | KeyCode::Char('l') => Intent::MoveRight,
        KeyCode::Up | KeyCode::Char('k') => Intent::Rotate,
        KeyCode::Down | KeyCode::Char('j') => Intent::SoftDrop,
        KeyCode::Enter | KeyCode::Char(' ') => Intent::HardDrop,
        KeyCode::Char('p') | KeyCode::Char('P') => Intent::PauseToggle,
        KeyCode::Char('s') | KeyCode::Char('S') => Intent::Start,
        KeyCode::Char('r') | KeyCode::Char('R') => Intent::Restart,
        _ => return Action::None,
    };
    Action::Game(intent)
}

/// Turns a left-button press, drag and release into swipe moves, swipe drops and taps.
///
/// Sideways drags move one column per `SWIPE_COLS` covered and downward drags soft-drop one row
/// per `SWIPE_ROWS`; the anchor follows each emitted step. Releasing without having swiped, on
/// the press cell or a neighbour, is a tap and rotates.
///
/// Only presses inside the board area start a gesture; a drag may then leave it.
#[derive(Debug, Clone, Default)]
pub struct Gesture {
    anchor: Option<(u16, u16)>,
    swiped: bool,
    /// `None` accepts presses anywhere.
    area: Option<Rect>,
}

impl Gesture {
    pub fn set_area(&mut self, area: Rect) {
        self.area = Some(area);
    }

    pub fn on_mouse(&mut self, ev: MouseEvent) -> Vec<Intent> {
        let pos = (ev.column, ev.row);
        match ev.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let inside = self
                    .area
                    .is_none_or(|a| a.contains(Position::new(ev.column, ev.row)));
                self.anchor = inside.then_some(pos);
                self.swiped = false;
                Vec::new()
            }
            MouseEventKind::Drag(MouseButton::Left) => self.drag(pos),
            MouseEventKind::Up(MouseButton::Left) => {
                let Some((ax, ay)) = self.anchor.take() else {
                    return Vec::new();
                };
                let tap = !self.swiped && pos.0.abs_diff(ax) <= 1 && pos.1.abs_diff(ay) <= 1;
                if tap {
                    vec![Intent::Rotate]
                } else {
                    Vec::new()
                }
            }
            _ => Vec::new(),
        }
    }

    fn drag(&mut self, (x, y): (u16, u16)) -> Vec<Intent> {
        let Some((ax, ay)) = self.anchor else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let (mut nx, mut ny) = (ax, ay);
        let dx = x.abs_diff(ax);
        if dx >= SWIPE_COLS {
            let intent = if x > ax { Intent::MoveRight } else { Intent::MoveLeft };
            out.extend(std::iter::repeat_n(intent, (dx / SWIPE_COLS) as usize));
            nx = x;
        }
        if y > ay && y - ay >= SWIPE_ROWS {
            out.extend(std::iter::repeat_n(Intent::SoftDrop, ((y - ay) / SWIPE_ROWS) as usize));
            ny = y;
        }
        if !out.is_empty() {
            self.swiped = true;
            self.anchor = Some((nx, ny));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    #[test]
    fn arrows_and_vim_keys_agree() {
        assert_eq!(key_to_action(key(KeyCode::Left)), key_to_action(key(KeyCode::Char('h'))));
        assert_eq!(key_to_action(key(KeyCode::Up)), Action::Game(Intent::Rotate));
        assert_eq!(key_to_action(key(KeyCode::Char(' '))), Action::Game(Intent::HardDrop));
        assert_eq!(key_to_action(key(KeyCode::Char('p'))), Action::Game(Intent::PauseToggle));
        assert_eq!(key_to_action(key(KeyCode::Esc)), Action::Quit);
    }

    #[test]
    fn modified_keys_are_ignored_except_ctrl_c() {
        let alt_h = KeyEvent::new(KeyCode::Char('h'), KeyModifiers::ALT);
        assert_eq!(key_to_action(alt_h), Action::None);
        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert_eq!(key_to_action(ctrl_c), Action::Quit);
    }

    #[test]
    fn tap_rotates() {
        let mut g = Gesture::default();
        assert!(g.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5)).is_empty());
        let out = g.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 11, 5));
        assert_eq!(out, vec![Intent::Rotate]);
    }

    #[test]
    fn sideways_drag_moves_per_step() {
        let mut g = Gesture::default();
        g.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        assert!(g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 11, 5)).is_empty());
        let out = g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 14, 5));
        assert_eq!(out, vec![Intent::MoveRight, Intent::MoveRight]);
        let out = g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 12, 5));
        assert_eq!(out, vec![Intent::MoveLeft]);
        // a swipe never ends in a tap
        let out = g.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 12, 5));
        assert!(out.is_empty());
    }

    #[test]
    fn downward_drag_soft_drops() {
        let mut g = Gesture::default();
        g.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 10, 5));
        let out = g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 7));
        assert_eq!(out, vec![Intent::SoftDrop, Intent::SoftDrop]);
        // dragging up does nothing
        assert!(g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 10, 3)).is_empty());
    }

    #[test]
    fn presses_outside_the_board_are_ignored() {
        let mut g = Gesture::default();
        g.set_area(Rect::new(10, 2, 20, 20));
        // sidebar click
        g.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 40, 5));
        assert!(g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 44, 5)).is_empty());
        assert!(g.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 44, 5)).is_empty());
        // board click, released past the edge after a swipe
        g.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 28, 5));
        let out = g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 32, 5));
        assert_eq!(out, vec![Intent::MoveRight, Intent::MoveRight]);
        g.on_mouse(mouse(MouseEventKind::Down(MouseButton::Left), 12, 3));
        let out = g.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 12, 3));
        assert_eq!(out, vec![Intent::Rotate]);
    }

    #[test]
    fn drag_without_press_is_ignored() {
        let mut g = Gesture::default();
        assert!(g.on_mouse(mouse(MouseEventKind::Drag(MouseButton::Left), 20, 20)).is_empty());
        assert!(g.on_mouse(mouse(MouseEventKind::Up(MouseButton::Left), 20, 20)).is_empty());
    }
}
