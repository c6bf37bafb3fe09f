//! Sound cue vocabulary and the audio collaborator interface
//!
//! The simulation only names cues. Synthesis lives behind [`AudioSink`]; each
//! cue carries a [`Tone`] description a synthesizer can play directly.

use serde::{Deserialize, Serialize};

use crate::driver::HookError;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Blaster shot
    Shoot,
    Sniper,
    /// Chain zap
    Tesla,
    Missile,
    Pulse,
    /// Beam hum
    Prism,
    Railgun,
    /// Orb contact
    Orbital,
    /// Enemy destroyed or life lost
    Explosion,
    /// Tower built, upgraded or sold
    Build,
}

/// Background music selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MusicMode {
    /// Level theme (endless plays theme 1)
    Level(u32),
    Boss,
    Off,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// A single synthesized blip
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    pub freq: f32,
    pub waveform: Waveform,
    /// Seconds
    pub duration: f32,
}

impl SoundEffect {
    pub fn tone(self) -> Tone {
        let (freq, waveform, duration) = match self {
            SoundEffect::Shoot => (400.0, Waveform::Triangle, 0.1),
            SoundEffect::Sniper => (800.0, Waveform::Square, 0.3),
            SoundEffect::Tesla => (200.0, Waveform::Sawtooth, 0.1),
            SoundEffect::Missile => (100.0, Waveform::Sawtooth, 0.6),
            SoundEffect::Pulse => (300.0, Waveform::Sine, 0.4),
            SoundEffect::Prism => (1000.0, Waveform::Sine, 0.1),
            SoundEffect::Railgun => (60.0, Waveform::Sawtooth, 0.8),
            SoundEffect::Orbital => (800.0, Waveform::Sine, 0.05),
            SoundEffect::Explosion => (80.0, Waveform::Sawtooth, 0.5),
            SoundEffect::Build => (600.0, Waveform::Sine, 0.2),
        };
        Tone {
            freq,
            waveform,
            duration,
        }
    }
}

/// Audio collaborator
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect) -> Result<(), HookError>;
    fn set_music(&mut self, mode: MusicMode) -> Result<(), HookError>;
    /// Lower the music (pause menu) or restore it
    fn set_ducked(&mut self, ducked: bool) -> Result<(), HookError>;
}

/// Sink that traces cues to the log; used by the headless binary
#[derive(Debug, Default)]
pub struct LogAudio {
    pub music: Option<MusicMode>,
    pub ducked: bool,
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) -> Result<(), HookError> {
        log::trace!("sfx {:?} {:?}", effect, effect.tone());
        Ok(())
    }

    fn set_music(&mut self, mode: MusicMode) -> Result<(), HookError> {
        if self.music != Some(mode) {
            log::debug!("music -> {:?}", mode);
            self.music = Some(mode);
        }
        Ok(())
    }

    fn set_ducked(&mut self, ducked: bool) -> Result<(), HookError> {
        self.ducked = ducked;
        Ok(())
    }
}
