//! Game loop / state machine: spawn, gravity, lock, line clears, respawn, pause and game over.
//!
//! A `Session` is the single owner of board, bag and falling piece. Every source of change
//! (keys, gestures, the gravity timer) becomes an [`Intent`] handled by [`Session::apply`],
//! one at a time and to completion.

use crate::bag::Bag;
use crate::board::{Board, WIDTH};
use crate::config::{GameConfig, level_for_lines};
use crate::controller::{Controller, Fall};
use crate::event::{Cue, Event, Phase, Redraw};
use crate::intent::{Intent, IntentQueue};
use crate::piece::{ActivePiece, Kind, MAX_SHAPE, Shape};
use crate::scheduler::TickScheduler;
use std::time::Duration;

/// Upcoming piece as shown in the 4×4 preview box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Preview {
    pub kind: Kind,
    pub shape: Shape,
    /// Row and column offset that centres the shape in the box.
    pub offset: usize,
}

impl Preview {
    fn of(piece: &ActivePiece) -> Self {
        Self {
            kind: piece.kind,
            shape: piece.shape,
            offset: (MAX_SHAPE - piece.shape.size()) / 2,
        }
    }

    /// Filled (row, col) positions inside the 4×4 preview box.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.shape
            .occupied()
            .map(|(r, c)| (r + self.offset, c + self.offset))
    }
}

/// Game state: board, current piece, next piece, score, level and phase.
#[derive(Debug)]
pub struct Session {
    config: GameConfig,
    board: Board,
    bag: Bag,
    active: Option<Controller>,
    next: ActivePiece,
    phase: Phase,
    score: u32,
    lines: u32,
    level: u32,
    scheduler: TickScheduler,
    events: Vec<Event>,
}

impl Session {
    pub fn new(config: GameConfig) -> Self {
        let mut bag = match config.seed {
            Some(seed) => Bag::with_seed(seed),
            None => Bag::new(),
        };
        let next = bag.next();
        let scheduler = TickScheduler::new(config.tick_interval_for(1));
        Self {
            config,
            board: Board::new(),
            bag,
            active: None,
            next,
            phase: Phase::Idle,
            score: 0,
            lines: 0,
            level: 1,
            scheduler,
            events: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// A game is in progress (possibly paused).
    pub fn is_playing(&self) -> bool {
        matches!(self.phase, Phase::Playing | Phase::Paused)
    }

    pub fn is_paused(&self) -> bool {
        self.phase == Phase::Paused
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active(&self) -> Option<&ActivePiece> {
        self.active.as_ref().map(Controller::piece)
    }

    pub fn preview(&self) -> Preview {
        Preview::of(&self.next)
    }

    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// Board cells to paint, including the falling piece, for a full repaint.
    pub fn painted_cells(&self) -> Vec<(usize, usize, Kind)> {
        let mut out: Vec<_> = self
            .board
            .cells()
            .filter_map(|(r, c, cell)| cell.kind().map(|k| (r, c, k)))
            .collect();
        if let Some(ctl) = &self.active {
            out.extend(ctl.painted());
        }
        out
    }

    /// Hand over everything emitted since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, Event> {
        self.events.drain(..)
    }

    /// Feed elapsed host time to the gravity timer; a due tick is queued, not run.
    pub fn advance_clock(&mut self, dt: Duration, queue: &mut IntentQueue) {
        if self.scheduler.advance(dt) {
            queue.push(Intent::Tick);
        }
    }

    /// Apply every queued intent in order.
    pub fn process(&mut self, queue: &mut IntentQueue) {
        while let Some(intent) = queue.pop() {
            self.apply(intent);
        }
    }

    /// Apply one intent. Intents that make no sense in the current phase are ignored.
    pub fn apply(&mut self, intent: Intent) {
        match intent {
            // a running or paused game is ended first
            Intent::Start | Intent::Restart => self.restart(),
            Intent::PauseToggle => match self.phase {
                Phase::Playing => self.pause(),
                Phase::Paused => self.resume(),
                _ => log::trace!("pause ignored in {:?}", self.phase),
            },
            _ if self.phase != Phase::Playing => {
                log::trace!("{intent:?} ignored in {:?}", self.phase);
            }
            Intent::MoveLeft => self.move_horizontal(-1),
            Intent::MoveRight => self.move_horizontal(1),
            Intent::SoftDrop => self.move_down(),
            Intent::HardDrop => self.hard_drop(),
            Intent::Rotate => self.rotate(),
            Intent::Tick => self.tick(),
        }
    }

    /// New game: empty board, zero score, first piece, gravity running.
    pub fn start(&mut self) {
        self.board = Board::new();
        self.score = 0;
        self.lines = 0;
        self.level = 1;
        self.scheduler
            .set_interval(self.config.tick_interval_for(self.level));
        self.events.push(Event::Score(0));
        self.events.push(Event::Level(1));
        self.set_phase(Phase::Playing);
        log::info!("game started");
        self.spawn();
        self.events.push(Event::Resync);
        if self.phase == Phase::Playing {
            self.scheduler.arm();
        }
    }

    /// Stop the clock unconditionally and leave the running game.
    pub fn end(&mut self) {
        self.scheduler.cancel();
        if self.is_playing() {
            self.set_phase(Phase::Idle);
        }
    }

    pub fn restart(&mut self) {
        self.end();
        self.start();
    }

    pub fn pause(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.scheduler.cancel();
        self.set_phase(Phase::Paused);
    }

    pub fn resume(&mut self) {
        if self.phase != Phase::Paused {
            return;
        }
        self.set_phase(Phase::Playing);
        self.scheduler.arm();
    }

    /// One gravity step.
    pub fn tick(&mut self) {
        if self.phase != Phase::Playing {
            return;
        }
        self.move_down();
    }

    fn move_horizontal(&mut self, dir: i32) {
        let Some(ctl) = self.active.as_mut() else {
            return;
        };
        if let Some(redraw) = ctl.move_horizontal(&self.board, dir) {
            self.events.push(Event::Redraw(redraw));
        }
    }

    fn rotate(&mut self) {
        let Some(ctl) = self.active.as_mut() else {
            return;
        };
        if let Some(redraw) = ctl.rotate_clockwise(&self.board) {
            self.events.push(Event::Redraw(redraw));
            self.events.push(Event::Sound(Cue::Rotate));
        }
    }

    fn move_down(&mut self) {
        let Some(ctl) = self.active.as_mut() else {
            return;
        };
        match ctl.move_down(&self.board) {
            Fall::Moved(redraw) => self.events.push(Event::Redraw(redraw)),
            Fall::Landed => self.lock_and_respawn(),
        }
    }

    fn hard_drop(&mut self) {
        let Some(ctl) = self.active.as_mut() else {
            return;
        };
        if let Some(redraw) = ctl.hard_drop(&self.board) {
            self.events.push(Event::Redraw(redraw));
        }
        self.events.push(Event::Sound(Cue::HardDrop));
        self.lock_and_respawn();
    }

    /// Lock the falling piece, clear rows, score, and bring in the next piece.
    fn lock_and_respawn(&mut self) {
        let Some(ctl) = self.active.take() else {
            return;
        };
        let piece = ctl.into_piece();
        if self.board.lock(&piece) {
            log::debug!("locked {:?} at ({}, {})", piece.kind, piece.row, piece.col);
        }
        let cleared = self.board.clear_full_rows_and_compact();
        if cleared > 0 {
            self.award_lines(cleared);
            self.events.push(Event::Resync);
        }
        self.spawn();
    }

    fn award_lines(&mut self, cleared: u32) {
        for _ in 0..cleared {
            self.score = self.score.saturating_add(self.config.points_per_line);
            self.events.push(Event::Sound(Cue::LineClear));
        }
        self.lines += cleared;
        self.events.push(Event::Score(self.score));
        log::debug!("cleared {cleared} row(s), score {}", self.score);
        let level = level_for_lines(self.lines);
        if level != self.level {
            self.level = level;
            self.scheduler
                .set_interval(self.config.tick_interval_for(level));
            self.events.push(Event::Level(level));
            log::info!("level {level}");
        }
    }

    /// Promote the previewed piece and deal a new preview, then check for game over.
    fn spawn(&mut self) {
        let piece = std::mem::replace(&mut self.next, self.bag.next());
        debug_assert_eq!(piece.col, ((WIDTH - piece.shape.size()) / 2) as i32);
        self.events.push(Event::NextPiece(self.next.kind));
        let ctl = Controller::new(piece);
        if !ctl.fits(&self.board) {
            // the blocked piece never enters the board
            log::debug!("{:?} cannot spawn", ctl.piece().kind);
            self.active = None;
            self.game_over();
            return;
        }
        self.events.push(Event::Redraw(Redraw {
            cleared: Vec::new(),
            painted: ctl.painted(),
        }));
        log::debug!("spawned {:?}", ctl.piece().kind);
        self.active = Some(ctl);
    }

    fn game_over(&mut self) {
        self.scheduler.cancel();
        self.set_phase(Phase::GameOver);
        self.events.push(Event::GameOver { score: self.score });
        log::info!("game over, final score {}", self.score);
    }

    fn set_phase(&mut self, phase: Phase) {
        if self.phase != phase {
            self.phase = phase;
            self.events.push(Event::Phase(phase));
        }
    }
}
