//! Advisory notifications for the renderer and audio collaborators.
//!
//! The session pushes these as it processes intents; hosts drain them after each batch.
//! Nothing in the core depends on anyone listening.

use crate::piece::Kind;

/// Named sound cues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    LineClear,
    Rotate,
    HardDrop,
}

impl Cue {
    pub fn name(self) -> &'static str {
        match self {
            Self::LineClear => "lineClear",
            Self::Rotate => "rotate",
            Self::HardDrop => "hardDrop",
        }
    }
}

/// Session phase as seen by collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Playing,
    Paused,
    GameOver,
}

/// Cells to unpaint and cells to paint after a move, rotation, drop or lock.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Redraw {
    pub cleared: Vec<(usize, usize)>,
    pub painted: Vec<(usize, usize, Kind)>,
}

impl Redraw {
    pub fn is_empty(&self) -> bool {
        self.cleared.is_empty() && self.painted.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Incremental repaint.
    Redraw(Redraw),
    /// The board changed wholesale (new game, line clear); repaint from a full read.
    Resync,
    /// Upcoming piece changed; read the preview.
    NextPiece(Kind),
    Score(u32),
    Level(u32),
    Sound(Cue),
    Phase(Phase),
    /// Terminal transition with the final score.
    GameOver { score: u32 },
}
