mod logging;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use burger_engine::{BurgerTime, GameConfig, Level, LevelScript, Message};
use clap::{Parser, ValueEnum};

const BUILTIN_LEVEL: &str = include_str!("../levels/level1.json");

/// Run the BurgerTime simulation headless and report how it went
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Level script to play (JSON); repeat to play several in order
    #[arg(short, long = "level")]
    levels: Vec<PathBuf>,

    /// Gameplay tuning overrides (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u32,

    /// Intent held down for the whole run; repeatable
    #[arg(long, value_enum)]
    hold: Vec<Intent>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Intent {
    Left,
    Right,
    Up,
    Down,
    Pepper,
}

impl Intent {
    fn message(self) -> Message {
        match self {
            Intent::Left => Message::MoveLeft,
            Intent::Right => Message::MoveRight,
            Intent::Up => Message::MoveUp,
            Intent::Down => Message::MoveDown,
            Intent::Pepper => Message::MainAction,
        }
    }
}

fn load_level(path: &Path) -> Result<Level> {
    let text = fs::read_to_string(path).with_context(|| format!("reading level {}", path.display()))?;
    let level = LevelScript::from_json(&text)
        .and_then(|script| script.build())
        .with_context(|| format!("compiling level {}", path.display()))?;
    Ok(level)
}

fn load_config(path: Option<&Path>) -> Result<GameConfig> {
    let Some(path) = path else {
        return Ok(GameConfig::default());
    };
    let text = fs::read_to_string(path).with_context(|| format!("reading config {}", path.display()))?;
    GameConfig::from_json(&text).with_context(|| format!("parsing config {}", path.display()))
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::init(args.verbose);

    let config = load_config(args.config.as_deref())?;
    let levels = if args.levels.is_empty() {
        vec![LevelScript::from_json(BUILTIN_LEVEL)?.build()?]
    } else {
        args.levels.iter().map(|p| load_level(p)).collect::<Result<Vec<_>>>()?
    };

    let mut game = BurgerTime::new(config, levels)?;
    for intent in &args.hold {
        game.input().hold(intent.message());
    }

    let frame_dt = game.config().fixed_dt;
    for frame in 0..args.frames {
        game.tick(frame_dt);
        for sound in game.sounds() {
            log::debug!("frame {frame}: sound {}", sound.0);
        }
        if game.exit_requested() || game.phase().is_over() {
            log::info!("stopping after frame {frame}: {:?}", game.phase());
            break;
        }
    }

    if let Some(player) = game.scene().find_by_tag(burger_engine::game::TAG_PLAYER) {
        log::info!("player at {} ({:?})", player.pos, player.action);
    }
    log::info!(
        "level '{}' after {} steps: {:?}, score {}, lives {}, pepper {}",
        game.level().name,
        game.steps(),
        game.phase(),
        game.score(),
        game.lives(),
        game.pepper()
    );
    Ok(())
}
