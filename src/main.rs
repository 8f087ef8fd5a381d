//! Blockfall: classic falling-block puzzle in the terminal.

mod app;
mod input;
mod theme;
mod ui;

use anyhow::{Context, Result, ensure};
use app::App;
use blockfall::GameConfig;
use blockfall::config::{DEFAULT_POINTS_PER_LINE, DEFAULT_TICK_MS};
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Accepted `--frame-rate` range, in frames per second.
const FRAME_RATE_RANGE: std::ops::RangeInclusive<f64> = 1.0..=240.0;

fn main() -> Result<()> {
    let args = Args::parse();
    if let Some(path) = args.log_file.as_deref() {
        init_logging(path)?;
    }
    args.frame_interval()?;
    let config = args.game_config();
    config.validate().context("invalid game options")?;
    let theme = theme::Theme::load(args.theme.as_deref(), args.palette).unwrap_or_else(|e| {
        log::warn!("theme not loaded, using defaults: {e}");
        theme::Theme::default()
    });
    log::info!("starting with {config:?}");
    let mut app = App::new(args, config, theme)?;
    app.run()?;
    Ok(())
}

/// Log to a file so output never lands on the alternate screen. Filter from `RUST_LOG`.
fn init_logging(path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("creating log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()
        .context("initialising logger")?;
    Ok(())
}

/// Classic falling-block puzzle in the terminal.
#[derive(Debug, Parser)]
#[command(
    name = "blockfall",
    version,
    about = "Classic falling-block puzzle in the terminal: 10x20 board, 7-bag pieces, flat line scoring.",
    long_about = "Blockfall is a terminal falling-block puzzle.\n\n\
        Move and rotate the falling piece; full rows clear and score. The game ends when a new \
        piece cannot enter the board.\n\n\
        CONTROLS:\n  Left/Right h/l  Move     Up k   Rotate     Down j   Soft drop\n  \
        Space/Enter     Hard drop  P      Pause      S        Start\n  \
        R               Restart    Q/Esc  Quit\n\n\
        MOUSE: drag sideways to move, drag down to soft drop, click to rotate.\n\n\
        Use --theme to load a btop-style theme (e.g. onedark.theme)."
)]
pub struct Args {
    /// Gravity interval in milliseconds.
    #[arg(long, default_value_t = DEFAULT_TICK_MS, value_name = "MS")]
    pub tick_ms: u64,

    /// Points awarded for each cleared row.
    #[arg(long, default_value_t = DEFAULT_POINTS_PER_LINE, value_name = "N")]
    pub points_per_line: u32,

    /// Gravity speeds up with level (every 10 lines). Off by default: level is display only.
    #[arg(long)]
    pub speed_up: bool,

    /// Seed for the piece bag, for reproducible games.
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Path to theme file (btop-style theme[key]=\"value\"). Uses One Dark if not set.
    #[arg(short, long, value_name = "FILE")]
    pub theme: Option<PathBuf>,

    /// Colour palette: normal (theme), high-contrast, or colorblind.
    #[arg(long, default_value = "normal")]
    pub palette: Palette,

    /// Ring the terminal bell on sound cues.
    #[arg(long)]
    pub bell: bool,

    /// Disable the line-clear flash.
    #[arg(long)]
    pub no_animation: bool,

    /// Skip the start screen and begin playing immediately.
    #[arg(long)]
    pub no_menu: bool,

    /// Target render frames per second.
    #[arg(long, default_value = "30.0", value_name = "RATE")]
    pub frame_rate: f64,

    /// Write logs to this file (filter with RUST_LOG).
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

impl Args {
    /// Time budget for one frame.
    pub fn frame_interval(&self) -> Result<Duration> {
        ensure!(
            FRAME_RATE_RANGE.contains(&self.frame_rate),
            "frame rate must be between {} and {}, got {}",
            FRAME_RATE_RANGE.start(),
            FRAME_RATE_RANGE.end(),
            self.frame_rate
        );
        Ok(Duration::try_from_secs_f64(1.0 / self.frame_rate)?)
    }

    fn game_config(&self) -> GameConfig {
        GameConfig {
            tick_interval: Duration::from_millis(self.tick_ms),
            points_per_line: self.points_per_line,
            speed_up: self.speed_up,
            seed: self.seed,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Palette {
    #[default]
    Normal,

    #[value(alias = "highcontrast", alias = "contrast")]
    HighContrast,

    #[value(alias = "colourblind")]
    Colorblind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_rules() {
        let args = Args::parse_from(["blockfall"]);
        let config = args.game_config();
        assert_eq!(config, GameConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_tick_is_rejected() {
        let args = Args::parse_from(["blockfall", "--tick-ms", "0"]);
        assert!(args.game_config().validate().is_err());
    }

    #[test]
    fn frame_rate_outside_range_is_rejected() {
        for rate in ["0", "1e-300", "NaN", "1000"] {
            let args = Args::parse_from(["blockfall", "--frame-rate", rate]);
            assert!(args.frame_interval().is_err(), "{rate}");
        }
        let args = Args::parse_from(["blockfall", "--frame-rate", "50"]);
        assert_eq!(args.frame_interval().unwrap().as_millis(), 20);
    }

    #[test]
    fn palette_aliases() {
        let args = Args::parse_from(["blockfall", "--palette", "colourblind", "--seed", "7"]);
        assert_eq!(args.palette, Palette::Colorblind);
        assert_eq!(args.seed, Some(7));
    }
}
