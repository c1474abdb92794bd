#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Frame driver for Bank Heist.
//!
//! A [`Simulation`] owns the screen state machine, the persisted progression,
//! the loaded levels and the session of the level being played. Every call to
//! [`Simulation::frame`] runs one fixed-cadence frame: it feeds the player's
//! input to the session, runs the pure systems in their canonical order and
//! reports the sound cues the presentation layer should play.

mod config;
pub mod hud;
mod progression;

use std::time::Duration;

use bank_heist_core::{Command, Event, ShopItem, SoundCue, TurretTarget, LEVEL_COUNT};
use bank_heist_system_spawning::{Config as SpawningConfig, Spawning};
use bank_heist_system_trap_contacts::TrapContacts;
use bank_heist_system_turret_combat::TurretCombat;
use bank_heist_system_turret_targeting::TurretTargeting;
use bank_heist_world::{self as world, query, Level, LevelError, Session, Statistics};
use glam::Vec2;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use config::{ConfigError, SimulationConfig};
pub use progression::{Progression, ProgressionError};

const SESSION_SEED_STRIDE: u64 = 0x9E37_79B9_7F4A_7C15;

/// Failures raised while preparing a simulation.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// A level file could not be loaded.
    #[error("failed to load level {number}")]
    Level {
        /// One-based number of the level.
        number: usize,
        /// Underlying failure.
        #[source]
        source: LevelError,
    },
    /// The persisted progression could not be read.
    #[error(transparent)]
    Progression(#[from] ProgressionError),
}

/// Screens the game moves between.
#[derive(Clone, Debug, PartialEq)]
pub enum Screen {
    /// Main menu.
    Title,
    /// A level is being played.
    Playing {
        /// One-based level number.
        level: usize,
    },
    /// The player held out long enough.
    Win {
        /// One-based level number.
        level: usize,
        /// Statistics of the finished attempt.
        statistics: Statistics,
    },
    /// The gold ran out.
    Lose {
        /// One-based level number.
        level: usize,
        /// Statistics of the finished attempt.
        statistics: Statistics,
    },
    /// Credits roll.
    Credits,
    /// Instructions.
    HowToPlay,
}

/// Entries of the title menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuChoice {
    /// Opens the instructions.
    HowToPlay,
    /// Starts the one-based level if it is unlocked.
    PlayLevel(usize),
    /// Opens the credits.
    Credits,
}

/// Player input sampled for a single frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameInput {
    /// Real time elapsed since the previous frame.
    pub dt: Duration,
    /// Cursor position in world units.
    pub cursor: Vec2,
    /// Deploys the held item and empties the hand.
    pub place: bool,
    /// Deploys the held item and keeps it in hand.
    pub place_repeat: bool,
    /// Shop entry clicked this frame.
    pub purchase: Option<ShopItem>,
    /// Title menu entry clicked this frame.
    pub menu: Option<MenuChoice>,
    /// Any key went down this frame.
    pub any_key: bool,
}

/// Everything that happened during a frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FrameReport {
    /// Sounds to play, in the order they were requested.
    pub cues: Vec<SoundCue>,
    /// Session events raised by the frame.
    pub events: Vec<Event>,
    /// Whether a won level changed the unlocks or high scores.
    pub progression_changed: bool,
}

/// Drives screens, sessions and systems one frame at a time.
#[derive(Debug)]
pub struct Simulation {
    config: SimulationConfig,
    levels: Vec<Level>,
    progression: Progression,
    screen: Screen,
    session: Option<Session>,
    frame: u64,
    screen_frames: u64,
    sessions_started: u64,
    spawning: Spawning,
    targeting: TurretTargeting,
    combat: TurretCombat,
    contacts: TrapContacts,
    targets: Vec<TurretTarget>,
    commands: Vec<Command>,
}

impl Simulation {
    /// Creates a simulation on the title screen.
    #[must_use]
    pub fn new(config: SimulationConfig, levels: Vec<Level>, progression: Progression) -> Self {
        Self {
            config,
            levels,
            progression,
            screen: Screen::Title,
            session: None,
            frame: 0,
            screen_frames: 0,
            sessions_started: 0,
            spawning: Spawning::new(SpawningConfig::default()),
            targeting: TurretTargeting::new(),
            combat: TurretCombat::new(),
            contacts: TrapContacts::new(),
            targets: Vec::new(),
            commands: Vec::new(),
        }
    }

    /// Loads every level and the persisted progression named by the configuration.
    pub fn load(config: SimulationConfig) -> Result<Self, SimulationError> {
        let levels = (1..=LEVEL_COUNT)
            .map(|number| {
                Level::load(&config.level_path(number))
                    .map_err(|source| SimulationError::Level { number, source })
            })
            .collect::<Result<Vec<_>, _>>()?;
        let progression = match &config.preferences_path {
            Some(path) => Progression::load(path)?,
            None => Progression::default(),
        };
        info!(
            levels = levels.len(),
            unlocked = progression.levels_unlocked(),
            "simulation loaded"
        );
        Ok(Self::new(config, levels, progression))
    }

    /// Configuration the simulation runs with.
    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Screen currently shown.
    #[must_use]
    pub fn screen(&self) -> &Screen {
        &self.screen
    }

    /// Session of the most recently started level, kept after it ends.
    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Unlocks and high scores.
    #[must_use]
    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    /// Frames simulated since start-up. Doubles as the tick counter of periodic checks.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Frames spent on the current screen, used to reveal text progressively.
    #[must_use]
    pub fn screen_frames(&self) -> u64 {
        self.screen_frames
    }

    /// Starts a fresh attempt at the one-based level.
    ///
    /// Returns `false` and changes nothing when the level is locked or unknown.
    pub fn start_level(&mut self, level: usize) -> bool {
        if !self.progression.is_unlocked(level) {
            debug!(level, "level is locked");
            return false;
        }
        let Some(layout) = level.checked_sub(1).and_then(|index| self.levels.get(index)) else {
            warn!(level, "level is unlocked but was never loaded");
            return false;
        };

        let seed = self.config.seed ^ self.sessions_started.wrapping_mul(SESSION_SEED_STRIDE);
        self.sessions_started = self.sessions_started.wrapping_add(1);
        self.session = Some(Session::new(layout, seed));
        self.enter(Screen::Playing { level });
        true
    }

    /// Writes the progression to the configured preferences file, if any.
    pub fn save_progression(&self) -> Result<(), ProgressionError> {
        match &self.config.preferences_path {
            Some(path) => self.progression.save(path),
            None => Ok(()),
        }
    }

    /// Runs a single frame.
    pub fn frame(&mut self, input: &FrameInput) -> FrameReport {
        let mut report = FrameReport::default();

        match self.screen {
            Screen::Title => self.title(input, &mut report),
            Screen::Playing { level } => self.play(level, input, &mut report),
            Screen::Win { .. } | Screen::Lose { .. } | Screen::Credits | Screen::HowToPlay => {
                if input.any_key {
                    self.enter(Screen::Title);
                }
            }
        }

        if let Some(session) = self.session.as_mut() {
            dispatch(session, Command::AdvanceEffects, &mut report);
        }
        self.frame = self.frame.wrapping_add(1);
        self.screen_frames = self.screen_frames.saturating_add(1);
        report
    }

    fn title(&mut self, input: &FrameInput, report: &mut FrameReport) {
        let Some(choice) = input.menu else {
            return;
        };
        report.cues.push(SoundCue::MenuSelect);
        match choice {
            MenuChoice::HowToPlay => self.enter(Screen::HowToPlay),
            MenuChoice::Credits => self.enter(Screen::Credits),
            MenuChoice::PlayLevel(level) => {
                let _ = self.start_level(level);
            }
        }
    }

    fn play(&mut self, level: usize, input: &FrameInput, report: &mut FrameReport) {
        let Some(session) = self.session.as_mut() else {
            self.enter(Screen::Title);
            return;
        };

        if query::gold(session) < 0.0 {
            let statistics = query::statistics(session);
            info!(level, kills = statistics.kills, "level failed");
            report.cues.push(SoundCue::LevelFailed);
            self.enter(Screen::Lose { level, statistics });
            return;
        }

        dispatch(session, Command::AdvanceClock { dt: input.dt }, report);
        if query::elapsed(session) >= self.config.win_after() {
            let gold = query::gold(session);
            let statistics = query::statistics(session);
            report.cues.push(SoundCue::LevelPassed);
            report.progression_changed = self.progression.record_win(level, gold);
            info!(level, gold, kills = statistics.kills, "level passed");
            if report.progression_changed {
                self.persist_progression();
            }
            self.enter(Screen::Win { level, statistics });
            return;
        }

        let tick = self.frame;
        dispatch(session, Command::AdvanceCombatants { tick }, report);

        self.targeting.handle(
            &query::turret_view(session),
            &query::enemy_view(session),
            query::path(session),
            &mut self.targets,
        );
        self.combat.handle(tick, &self.targets, &mut self.commands);
        for command in self.commands.drain(..) {
            dispatch(session, command, report);
        }

        self.contacts.handle(
            &query::trap_view(session),
            &query::enemy_view(session),
            &mut self.commands,
        );
        for command in self.commands.drain(..) {
            dispatch(session, command, report);
        }

        dispatch(session, Command::Sweep, report);

        if let Some(item) = input.purchase {
            dispatch(session, Command::Purchase { item }, report);
        }
        dispatch(session, Command::ExpireCooldowns, report);
        if input.purchase.is_none() && (input.place || input.place_repeat) {
            dispatch(
                session,
                Command::Place {
                    cursor: input.cursor,
                    repeat: input.place_repeat,
                },
                report,
            );
        }

        self.spawning
            .handle(tick, query::spawned(session), &mut self.commands);
        for command in self.commands.drain(..) {
            dispatch(session, command, report);
        }
    }

    fn enter(&mut self, screen: Screen) {
        info!(from = ?self.screen, to = ?screen, "screen changed");
        self.screen = screen;
        self.screen_frames = 0;
    }

    fn persist_progression(&self) {
        match self.save_progression() {
            Ok(()) => info!(
                unlocked = self.progression.levels_unlocked(),
                "progression saved"
            ),
            Err(error) => warn!(%error, "failed to save progression"),
        }
    }
}

fn dispatch(session: &mut Session, command: Command, report: &mut FrameReport) {
    let start = report.events.len();
    world::apply(session, command, &mut report.events);
    report
        .cues
        .extend(report.events[start..].iter().filter_map(Event::cue));
}
