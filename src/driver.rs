//! Fixed-timestep host driver
//!
//! Owns the session and its collaborators. Wall-clock time goes into an
//! accumulator; each `SIM_DT` step runs one simulation frame, after which
//! events are routed to audio and result sinks. A snapshot is rendered once
//! per `update`. Collaborator failures are logged and never stop the game.

use std::collections::VecDeque;

use thiserror::Error;

use crate::audio::AudioSink;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::settings::Settings;
use crate::sim::{Command, GameEvent, GameState, SessionResult, Snapshot};

/// Longest frame delta accepted before clamping
const MAX_FRAME_DT: f32 = 0.1;

/// Failure reported by a collaborator
#[derive(Debug, Error)]
pub enum HookError {
    #[error("render failed: {0}")]
    Render(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub trait Renderer {
    fn render(&mut self, snapshot: &Snapshot) -> Result<(), HookError>;
}

/// Receives the result once a session ends
pub trait ResultSink {
    fn record(&mut self, result: &SessionResult) -> Result<(), HookError>;
}

pub struct Driver<R, A, S> {
    state: GameState,
    settings: Settings,
    renderer: R,
    audio: A,
    results: S,
    accumulator: f32,
    commands: VecDeque<Command>,
}

impl<R: Renderer, A: AudioSink, S: ResultSink> Driver<R, A, S> {
    pub fn new(state: GameState, settings: Settings, renderer: R, audio: A, results: S) -> Self {
        Self {
            state,
            settings,
            renderer,
            audio,
            results,
            accumulator: 0.0,
            commands: VecDeque::new(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn results(&self) -> &S {
        &self.results
    }

    /// Queue a command for the next frame boundary
    pub fn queue(&mut self, command: Command) {
        self.commands.push_back(command);
    }

    /// Commands waiting for the next frame boundary
    pub fn pending(&self) -> usize {
        self.commands.len()
    }

    pub fn is_over(&self) -> bool {
        self.state.phase.is_over()
    }

    /// Advance by `dt` seconds of wall-clock time. Returns the events produced.
    pub fn update(&mut self, dt: f32) -> Vec<GameEvent> {
        self.accumulator += dt.min(MAX_FRAME_DT);

        let mut events = Vec::new();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            events.extend(self.step());
            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        self.render();
        events
    }

    /// One frame: apply queued commands, run the simulation, flush events
    pub fn step(&mut self) -> Vec<GameEvent> {
        while let Some(command) = self.commands.pop_front() {
            if !self.state.apply(command) {
                log::debug!("command refused: {:?}", command);
            }
        }
        let events = self.state.frame();
        self.dispatch(&events);
        events
    }

    pub fn render(&mut self) {
        let mut snapshot = self.state.snapshot();
        snapshot.shake = self.settings.shake_amount(snapshot.shake);
        if let Err(e) = self.renderer.render(&snapshot) {
            log::warn!("Renderer error: {}", e);
        }
    }

    fn dispatch(&mut self, events: &[GameEvent]) {
        for event in events {
            let outcome = match event {
                GameEvent::Sound { effect } => self.audio.play(*effect),
                GameEvent::Music { mode } => self.audio.set_music(*mode),
                GameEvent::PauseChanged { paused } if self.settings.duck_on_pause => {
                    self.audio.set_ducked(*paused)
                }
                GameEvent::SessionEnded { result } => self.results.record(result),
                _ => Ok(()),
            };
            if let Err(e) = outcome {
                log::warn!("Collaborator error on {:?}: {}", event, e);
            }
        }
    }
}
