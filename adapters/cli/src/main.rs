#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that plays Bank Heist headlessly.
//!
//! The runner starts a level, deploys a scripted list of turrets and traps as
//! soon as they are affordable, and simulates frames at the configured cadence
//! until the level is won or lost.

use std::{
    collections::{BTreeMap, VecDeque},
    path::PathBuf,
    str::FromStr,
    time::Duration,
};

use anyhow::{bail, Context, Result};
use bank_heist_core::{ShopItem, SoundCue, TileCoord};
use bank_heist_simulation::{hud, FrameInput, Screen, Simulation, SimulationConfig};
use bank_heist_world::query;
use clap::Parser;
use tracing::{info, warn};

/// Headless Bank Heist runner.
#[derive(Debug, Parser)]
#[command(name = "bank-heist", version)]
struct Cli {
    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory holding the level files.
    #[arg(long)]
    levels_dir: Option<PathBuf>,
    /// File storing unlocks and high scores.
    #[arg(long)]
    preferences: Option<PathBuf>,
    /// Keep progression in memory instead of reading and writing it.
    #[arg(long, conflicts_with = "preferences")]
    no_save: bool,
    /// Seed of the random number generator.
    #[arg(long)]
    seed: Option<u64>,
    /// One-based level to play.
    #[arg(long, default_value_t = 1)]
    level: usize,
    /// Maximum number of frames to simulate.
    #[arg(long)]
    frames: Option<u64>,
    /// Item to deploy, as `kind@column,row`. Kinds: pistol, shotgun, uzi, spike, bomb.
    #[arg(long = "place")]
    placements: Vec<Placement>,
    /// Print the game instructions and exit.
    #[arg(long)]
    how_to_play: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut SimulationConfig) {
        if let Some(levels_dir) = &self.levels_dir {
            config.levels_dir = levels_dir.clone();
        }
        if let Some(preferences) = &self.preferences {
            config.preferences_path = Some(preferences.clone());
        }
        if self.no_save {
            config.preferences_path = None;
        }
        if let Some(seed) = self.seed {
            config.seed = seed;
        }
    }
}

/// Shop item to buy and the tile to deploy it on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placement {
    item: ShopItem,
    tile: TileCoord,
}

impl FromStr for Placement {
    type Err = String;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let (kind, position) = text
            .split_once('@')
            .ok_or_else(|| format!("expected `kind@column,row`, got `{text}`"))?;
        let item = match kind.trim().to_ascii_lowercase().as_str() {
            "pistol" => ShopItem::PistolTurret,
            "shotgun" => ShopItem::ShotgunTurret,
            "uzi" => ShopItem::UziTurret,
            "spike" => ShopItem::SpikeTrap,
            "bomb" => ShopItem::BombTrap,
            other => return Err(format!("unknown item `{other}`")),
        };
        let (column, row) = position
            .split_once(',')
            .ok_or_else(|| format!("expected `column,row`, got `{position}`"))?;
        let parse = |value: &str| {
            value
                .trim()
                .parse::<i32>()
                .map_err(|error| format!("invalid coordinate `{value}`: {error}"))
        };
        Ok(Self {
            item,
            tile: TileCoord::new(parse(column)?, parse(row)?),
        })
    }
}

/// Buys and deploys the scripted placements one at a time.
#[derive(Debug)]
struct Autopilot {
    pending: VecDeque<Placement>,
}

impl Autopilot {
    fn new(placements: Vec<Placement>) -> Self {
        Self {
            pending: placements.into(),
        }
    }

    fn input(&mut self, simulation: &Simulation, dt: Duration) -> FrameInput {
        let mut input = FrameInput {
            dt,
            ..FrameInput::default()
        };
        let Some(session) = simulation.session() else {
            return input;
        };

        while let Some(next) = self.pending.front().copied() {
            if query::holding(session).is_some() {
                input.cursor = next.tile.center();
                input.place = true;
                let _ = self.pending.pop_front();
                return input;
            }

            let underneath = query::tile_grid(session).peek(next.tile);
            let fits = next
                .item
                .placeable()
                .is_some_and(|placeable| placeable.fits_on(underneath));
            if !fits {
                warn!(item = ?next.item, tile = ?next.tile, "placement does not fit, skipping");
                let _ = self.pending.pop_front();
                continue;
            }

            if query::cash(session) >= next.item.price() {
                input.purchase = Some(next.item);
            }
            return input;
        }
        input
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .init();
    }
}

/// Entry point for the Bank Heist command-line interface.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    if cli.how_to_play {
        for line in hud::how_to_play(u64::MAX) {
            println!("{line}");
        }
        return Ok(());
    }

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)
            .with_context(|| format!("failed to load configuration {}", path.display()))?,
        None => SimulationConfig::default(),
    };
    cli.apply_overrides(&mut config);
    let frames = cli.frames.unwrap_or_else(|| {
        config
            .win_after_secs
            .saturating_mul(u64::from(config.frame_rate.max(1)))
            .saturating_add(2)
    });

    let mut simulation = Simulation::load(config).context("failed to prepare the game")?;
    if !simulation.start_level(cli.level) {
        bail!("level {} is locked or does not exist", cli.level);
    }

    let dt = simulation.config().frame_duration();
    let mut autopilot = Autopilot::new(cli.placements);
    let mut cues: BTreeMap<SoundCue, u32> = BTreeMap::new();
    for _ in 0..frames {
        let input = autopilot.input(&simulation, dt);
        let report = simulation.frame(&input);
        for cue in report.cues {
            *cues.entry(cue).or_default() += 1;
        }
        if !matches!(simulation.screen(), Screen::Playing { .. }) {
            break;
        }
    }

    print_outcome(&simulation, &cues);
    simulation
        .save_progression()
        .context("failed to save progression")?;
    Ok(())
}

fn print_outcome(simulation: &Simulation, cues: &BTreeMap<SoundCue, u32>) {
    for (cue, count) in cues {
        info!(cue = cue.name(), count, "sound cue");
    }

    let statistics = match simulation.screen() {
        Screen::Win { level, statistics } => {
            println!("Level {level} passed");
            Some(*statistics)
        }
        Screen::Lose { level, statistics } => {
            println!("Level {level} failed");
            Some(*statistics)
        }
        screen => {
            println!("Stopped on {screen:?}");
            simulation.session().map(query::statistics)
        }
    };

    if let Some(session) = simulation.session() {
        let hud = query::hud(session);
        println!(
            "gold {} | time {} | cash {}",
            hud::format_counter(hud.gold, hud::COUNTER_DIGITS),
            hud::format_counter(hud.elapsed_seconds as f32, hud::COUNTER_DIGITS),
            hud::format_counter(hud.cash as f32, hud::COUNTER_DIGITS),
        );
    }
    if let Some(statistics) = statistics {
        for line in hud::summary_lines(&statistics) {
            println!("{line}");
        }
    }
    for line in hud::menu_lines(simulation.progression()) {
        println!("{line}");
    }
}
