//! Sound effects
//!
//! Effects are procedural: each one is a short sequence of tones handed to
//! whatever backend the host provides. No external files needed.

use crate::settings::Settings;
use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Echo launched
    Echo,
    /// Player caught
    Death,
    /// Enemy destroyed by an echo
    Shatter,
    /// Arena cleared
    LevelUp,
    /// Pause toggled
    Pause,
}

/// Oscillator shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Triangle,
    Square,
    Sawtooth,
}

/// One tone of an effect
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency (Hz)
    pub freq: f32,
    /// End frequency (Hz) for sweeps; equal to `freq` for a flat tone
    pub end_freq: f32,
    /// Seconds after the effect starts
    pub delay: f32,
    pub duration: f32,
    pub wave: Waveform,
    /// Relative loudness before master/sfx gain
    pub level: f32,
}

impl Tone {
    const fn flat(freq: f32, delay: f32, duration: f32, wave: Waveform, level: f32) -> Self {
        Self {
            freq,
            end_freq: freq,
            delay,
            duration,
            wave,
            level,
        }
    }

    const fn sweep(freq: f32, end_freq: f32, duration: f32, wave: Waveform, level: f32) -> Self {
        Self {
            freq,
            end_freq,
            delay: 0.0,
            duration,
            wave,
            level,
        }
    }
}

impl SoundEffect {
    /// Sound for a simulation event, if it has one
    pub fn from_event(event: GameEvent) -> Option<Self> {
        match event {
            GameEvent::EchoCreated => Some(Self::Echo),
            GameEvent::EnemyShattered => Some(Self::Shatter),
            GameEvent::PlayerDied => Some(Self::Death),
            GameEvent::LevelAdvanced { .. } => Some(Self::LevelUp),
            GameEvent::PauseToggled { .. } => Some(Self::Pause),
            GameEvent::RoundStarted { .. } => None,
        }
    }

    /// Per-effect volume before settings are applied
    pub fn base_volume(self) -> f32 {
        match self {
            Self::Echo => 0.5,
            Self::Death => 0.9,
            Self::Shatter => 0.8,
            Self::LevelUp => 0.8,
            Self::Pause => 0.3,
        }
    }

    /// Tones making up the effect
    pub fn tones(self) -> Vec<Tone> {
        match self {
            // Echo - falling shimmer
            Self::Echo => vec![
                Tone::sweep(900.0, 300.0, 0.35, Waveform::Sine, 0.4),
                Tone::flat(1350.0, 0.05, 0.25, Waveform::Sine, 0.15),
            ],
            // Death - descending run
            Self::Death => [400.0, 350.0, 300.0, 200.0]
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone::flat(freq, i as f32 * 0.2, 0.4, Waveform::Sine, 0.3))
                .collect(),
            // Shatter - noisy crack
            Self::Shatter => vec![
                Tone::sweep(1200.0, 200.0, 0.15, Waveform::Sawtooth, 0.4),
                Tone::flat(2400.0, 0.0, 0.05, Waveform::Square, 0.15),
            ],
            // Level up - rising arpeggio
            Self::LevelUp => [400.0, 500.0, 600.0, 800.0]
                .iter()
                .enumerate()
                .map(|(i, &freq)| Tone::flat(freq, i as f32 * 0.1, 0.5, Waveform::Triangle, 0.3))
                .collect(),
            // Pause - soft blip
            Self::Pause => vec![Tone::flat(440.0, 0.0, 0.08, Waveform::Triangle, 0.3)],
        }
    }
}

/// Whatever actually makes noise
pub trait AudioBackend {
    fn play(&mut self, effect: SoundEffect, tones: &[Tone], gain: f32);
}

/// Backend that only logs what it would play
#[derive(Debug, Default)]
pub struct LogBackend;

impl AudioBackend for LogBackend {
    fn play(&mut self, effect: SoundEffect, tones: &[Tone], gain: f32) {
        log::debug!("Sound {:?}: {} tones at gain {:.2}", effect, tones.len(), gain);
    }
}

/// Audio manager for the game
pub struct AudioManager {
    backend: Option<Box<dyn AudioBackend>>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new(None)
    }
}

impl AudioManager {
    pub fn new(backend: Option<Box<dyn AudioBackend>>) -> Self {
        if backend.is_none() {
            log::warn!("No audio backend - audio disabled");
        }
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volumes and mute state from settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume() * effect.base_volume();
        if vol <= 0.0 {
            return;
        }
        let Some(backend) = self.backend.as_mut() else { return };
        backend.play(effect, &effect.tones(), vol);
    }

    /// Play whatever the drained simulation events call for
    pub fn handle_events(&mut self, events: &[GameEvent]) {
        for &event in events {
            if let Some(effect) = SoundEffect::from_event(event) {
                self.play(effect);
            }
        }
    }
}
