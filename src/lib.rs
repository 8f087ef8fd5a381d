//! Blockfall core: a headless falling-block puzzle engine.
//!
//! The engine owns the board, the piece bag and the falling piece. Hosts push [`Intent`]s in
//! and drain [`Event`]s out; rendering, audio and input devices live outside this crate.

pub mod bag;
pub mod board;
pub mod config;
pub mod controller;
pub mod event;
pub mod intent;
pub mod piece;
pub mod scheduler;
pub mod session;

pub use bag::Bag;
pub use board::{Board, Cell, HEIGHT, WIDTH};
pub use config::{ConfigError, GameConfig};
pub use controller::{Controller, Fall};
pub use event::{Cue, Event, Phase, Redraw};
pub use intent::{Intent, IntentQueue};
pub use piece::{ActivePiece, Kind, Shape};
pub use scheduler::TickScheduler;
pub use session::{Preview, Session};
