//! Session driver
//!
//! Owns the arena, runs the fixed-step clock and fans every tick out to the
//! registered observers. The driver is the only thing that mutates the arena;
//! observers see it read-only after each tick.

use crate::config::ArenaConfig;
use crate::consts::{MAX_FRAME_DT, MAX_SUBSTEPS};
use crate::error::ConfigResult;
use crate::sim::{Arena, SimulationEvent, tick};

/// Driver lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverState {
    /// Arena built (or dropped) but not ticking
    Stopped,
    Running,
    Paused,
    /// A terminal event fired; only `reset` or `stop` leave this state
    GameOver,
}

/// Control commands, usually mapped from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Resume,
    TogglePause,
    Reset,
    Stop,
}

impl Command {
    /// Map a key name to a command
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            " " | "Space" | "p" | "P" => Some(Command::TogglePause),
            "Enter" => Some(Command::Start),
            "r" | "R" => Some(Command::Reset),
            "Escape" => Some(Command::Stop),
            _ => None,
        }
    }
}

/// What observers receive after every tick
#[derive(Debug)]
pub struct TickFrame<'a> {
    /// Arena tick counter after this tick
    pub tick: u64,
    /// Events in causal order
    pub events: &'a [SimulationEvent],
    pub arena: &'a Arena,
}

/// Read-only sink notified after each tick
pub trait SimulationObserver {
    fn on_tick(&mut self, frame: &TickFrame<'_>);

    /// Called when the arena is rebuilt or dropped
    fn on_reset(&mut self) {}
}

pub struct Simulation {
    config: ArenaConfig,
    arena: Option<Arena>,
    state: DriverState,
    accumulator: f32,
    observers: Vec<Box<dyn SimulationObserver>>,
}

impl Simulation {
    /// Validate the config and build the first arena (stopped)
    pub fn new(config: ArenaConfig) -> ConfigResult<Self> {
        let arena = Arena::new(config.clone())?;
        Ok(Self {
            config,
            arena: Some(arena),
            state: DriverState::Stopped,
            accumulator: 0.0,
            observers: Vec::new(),
        })
    }

    pub fn add_observer(&mut self, observer: Box<dyn SimulationObserver>) {
        self.observers.push(observer);
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    pub fn arena(&self) -> Option<&Arena> {
        self.arena.as_ref()
    }

    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Begin ticking. Builds a fresh arena if the previous one was stopped.
    pub fn start(&mut self) -> ConfigResult<()> {
        match self.state {
            DriverState::Stopped => {
                if self.arena.is_none() {
                    self.arena = Some(Arena::new(self.config.clone())?);
                    self.notify_reset();
                }
                self.accumulator = 0.0;
                self.state = DriverState::Running;
                log::info!("Simulation started");
            }
            DriverState::GameOver => log::warn!("Start ignored: session is over, reset first"),
            DriverState::Running | DriverState::Paused => {
                log::debug!("Start ignored in {:?}", self.state);
            }
        }
        Ok(())
    }

    pub fn pause(&mut self) {
        if self.state == DriverState::Running {
            self.state = DriverState::Paused;
            log::info!("Simulation paused");
        }
    }

    pub fn resume(&mut self) {
        if self.state == DriverState::Paused {
            self.accumulator = 0.0;
            self.state = DriverState::Running;
            log::info!("Simulation resumed");
        }
    }

    pub fn toggle_pause(&mut self) {
        match self.state {
            DriverState::Running => self.pause(),
            DriverState::Paused => self.resume(),
            _ => log::debug!("Pause toggle ignored in {:?}", self.state),
        }
    }

    /// Drop the current arena and build a fresh one from the same config
    pub fn reset(&mut self) -> ConfigResult<()> {
        self.arena = None;
        self.arena = Some(Arena::new(self.config.clone())?);
        self.accumulator = 0.0;
        self.state = DriverState::Stopped;
        self.notify_reset();
        log::info!("Simulation reset");
        Ok(())
    }

    /// Drop the arena. `start` builds a new one.
    pub fn stop(&mut self) {
        if self.arena.take().is_some() {
            self.notify_reset();
        }
        self.accumulator = 0.0;
        self.state = DriverState::Stopped;
        log::info!("Simulation stopped");
    }

    pub fn apply(&mut self, command: Command) -> ConfigResult<()> {
        match command {
            Command::Start => self.start()?,
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => self.toggle_pause(),
            Command::Reset => self.reset()?,
            Command::Stop => self.stop(),
        }
        Ok(())
    }

    /// Run exactly one tick if running, notify observers and return its events
    pub fn step(&mut self) -> Vec<SimulationEvent> {
        if self.state != DriverState::Running {
            return Vec::new();
        }
        let Some(arena) = self.arena.as_mut() else {
            return Vec::new();
        };

        let events = tick(arena);
        let frame = TickFrame {
            tick: arena.time_ticks,
            events: &events,
            arena,
        };
        for observer in &mut self.observers {
            observer.on_tick(&frame);
        }

        if events
            .iter()
            .any(|e| matches!(e, SimulationEvent::GameOver { .. }))
        {
            self.state = DriverState::GameOver;
            self.accumulator = 0.0;
            log::info!("Simulation over at tick {}", frame.tick);
        }
        events
    }

    /// Feed wall-clock time; runs as many fixed ticks as fit, capped per call
    ///
    /// Returns the number of ticks run.
    pub fn advance(&mut self, frame_dt: f32) -> u32 {
        if self.state != DriverState::Running {
            return 0;
        }
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        let dt = self.config.dt();
        self.accumulator += frame_dt;

        let mut substeps = 0;
        while self.accumulator >= dt && substeps < MAX_SUBSTEPS {
            self.step();
            self.accumulator -= dt;
            substeps += 1;
            if self.state != DriverState::Running {
                self.accumulator = 0.0;
                break;
            }
        }
        substeps
    }

    fn notify_reset(&mut self) {
        for observer in &mut self.observers {
            observer.on_reset();
        }
    }
}
