//! App: terminal init, main loop, clock and input plumbing.
//!
//! Keys, mouse gestures and the gravity clock all become intents on one queue; the session
//! drains it once per frame and the resulting events update the canvas, HUD and effects.

use crate::Args;
use crate::input::{Action, Gesture, key_to_action};
use crate::theme::Theme;
use crate::ui::{self, Canvas, Hud, View};
use anyhow::{Context, Result};
use blockfall::{Cue, Event, GameConfig, Intent, IntentQueue, Session};
use crossterm::event::{self, Event as TermEvent, KeyEventKind};
use ratatui::DefaultTerminal;
use std::time::{Duration, Instant};
use tachyonfx::Effect;

pub struct App {
    args: Args,
    theme: Theme,
    session: Session,
    queue: IntentQueue,
    canvas: Canvas,
    hud: Hud,
    gesture: Gesture,
    last_clock: Instant,
    /// TachyonFX flash for a line clear (created on first render after the cue).
    line_clear_effect: Option<Effect>,
    line_clear_effect_process_time: Option<Instant>,
    flashing: bool,
    ring_bell: bool,
}

impl App {
    pub fn new(args: Args, config: GameConfig, theme: Theme) -> Result<Self> {
        let mut session = Session::new(config);
        let mut queue = IntentQueue::new();
        if args.no_menu {
            queue.push(Intent::Start);
        }
        session.process(&mut queue);
        let mut app = Self {
            args,
            theme,
            session,
            queue,
            canvas: Canvas::default(),
            hud: Hud {
                level: 1,
                ..Hud::default()
            },
            gesture: Gesture::default(),
            last_clock: Instant::now(),
            line_clear_effect: None,
            line_clear_effect_process_time: None,
            flashing: false,
            ring_bell: false,
        };
        app.dispatch_events();
        Ok(app)
    }

    /// Fold everything the session emitted into host-side state.
    fn dispatch_events(&mut self) {
        let events: Vec<Event> = self.session.drain_events().collect();
        for ev in &events {
            if self.canvas.update(ev, &self.session) {
                continue;
            }
            match ev {
                Event::Score(score) => self.hud.score = *score,
                Event::Level(level) => self.hud.level = *level,
                Event::Sound(cue) => {
                    log::debug!("cue {}", cue.name());
                    if *cue == Cue::LineClear && !self.args.no_animation {
                        self.flashing = true;
                        self.line_clear_effect = None;
                        self.line_clear_effect_process_time = None;
                    }
                    self.ring_bell |= self.args.bell;
                }
                Event::Phase(phase) => {
                    log::debug!("phase {phase:?}");
                    if self.session.is_playing() {
                        self.hud.final_score = None;
                    }
                }
                Event::GameOver { score } => self.hud.final_score = Some(*score),
                Event::NextPiece(kind) => log::trace!("next {kind:?}"),
                Event::Redraw(_) | Event::Resync => {}
            }
        }
    }

    fn handle_terminal_event(&mut self, ev: TermEvent) -> bool {
        match ev {
            TermEvent::Key(key) => {
                // Held keys repeat moves and soft drops only.
                let action = key_to_action(key);
                let accept = match key.kind {
                    KeyEventKind::Press => true,
                    KeyEventKind::Repeat => matches!(
                        action,
                        Action::Game(Intent::MoveLeft | Intent::MoveRight | Intent::SoftDrop)
                    ),
                    KeyEventKind::Release => false,
                };
                if !accept {
                    return false;
                }
                match action {
                    Action::Quit => return true,
                    Action::Game(intent) => self.queue.push(intent),
                    Action::None => {}
                }
            }
            TermEvent::Mouse(mouse) => self.queue.extend(self.gesture.on_mouse(mouse)),
            TermEvent::Resize(..) => {
                self.line_clear_effect = None;
            }
            _ => {}
        }
        false
    }

    pub fn run(&mut self) -> Result<()> {
        use crossterm::{
            event::{DisableMouseCapture, EnableMouseCapture},
            execute,
            terminal::{
                EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
            },
        };

        enable_raw_mode().context("enabling raw mode")?;
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableMouseCapture)
            .context("entering alternate screen")?;

        let mut terminal =
            ratatui::DefaultTerminal::new(ratatui::backend::CrosstermBackend::new(stdout))?;

        let result = self.run_loop(&mut terminal);

        // Restore
        let _ = execute!(std::io::stdout(), DisableMouseCapture);
        execute!(std::io::stdout(), LeaveAlternateScreen)?;
        disable_raw_mode()?;

        result
    }

    fn run_loop(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        let frame_duration = self.args.frame_interval()?;
        self.last_clock = Instant::now();
        loop {
            let now = Instant::now();
            terminal.draw(|f| {
                let view = View {
                    session: &self.session,
                    canvas: &self.canvas,
                    hud: &self.hud,
                    theme: &self.theme,
                };
                ui::draw(f, &view);
                self.gesture.set_area(ui::board_rect(f.area()));
                if self.flashing {
                    ui::render_flash(
                        f,
                        &self.theme,
                        &mut self.line_clear_effect,
                        &mut self.line_clear_effect_process_time,
                        now,
                    );
                }
            })?;

            if self.flashing && self.line_clear_effect.as_ref().is_some_and(Effect::done) {
                self.flashing = false;
                self.line_clear_effect = None;
                self.line_clear_effect_process_time = None;
            }

            if self.ring_bell {
                self.ring_bell = false;
                execute_bell()?;
            }

            let timeout = frame_duration.saturating_sub(now.elapsed());
            if event::poll(timeout)? {
                while event::poll(Duration::ZERO)? {
                    if self.handle_terminal_event(event::read()?) {
                        return Ok(());
                    }
                }
            }

            let clock = Instant::now();
            let dt = clock.saturating_duration_since(self.last_clock);
            self.last_clock = clock;
            self.session.advance_clock(dt, &mut self.queue);
            self.session.process(&mut self.queue);
            self.dispatch_events();
        }
    }
}

fn execute_bell() -> Result<()> {
    use crossterm::{execute, style::Print};
    execute!(std::io::stdout(), Print("\x07"))?;
    Ok(())
}
