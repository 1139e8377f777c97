//! Match audio
//!
//! The engine talks to an [`AudioSink`]. In the browser that is [`WebAudio`]:
//! procedurally generated effects through the Web Audio API plus the
//! umpire's voice through speech synthesis, no external files needed.
//! Native builds use [`LogAudio`].

use log::info;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEffect {
    /// Boot on ball
    Kick,
    /// Clean catch
    Mark,
    /// Ball spilled in a tackle
    Tackle,
    /// Through the big sticks
    Goal,
    /// Through the little sticks
    Behind,
    /// End of a quarter
    Siren,
}

/// Umpire call when a kick leaves the ground without bouncing
pub const OUT_ON_THE_FULL: &str = "Out of bounds, on the full";

/// Audio collaborator. Implementations handle their own failures.
pub trait AudioSink {
    fn play(&mut self, effect: SoundEffect);

    /// Speak a phrase aloud
    fn announce(&mut self, phrase: &str);

    /// Called on match start (browsers only allow audio after a user gesture)
    fn resume(&mut self) {}

    /// Release audio resources; nothing plays afterwards
    fn shutdown(&mut self) {}
}

/// Writes every effect and phrase to the log
#[derive(Debug, Default)]
pub struct LogAudio {
    muted: bool,
}

impl LogAudio {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }
}

impl AudioSink for LogAudio {
    fn play(&mut self, effect: SoundEffect) {
        if !self.muted {
            info!("sfx: {effect:?}");
        }
    }

    fn announce(&mut self, phrase: &str) {
        if !self.muted {
            info!("umpire: \"{phrase}\"");
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::WebAudio;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{
        AudioContext, GainNode, OscillatorNode, OscillatorType, SpeechSynthesisUtterance,
    };

    use super::{AudioSink, SoundEffect};
    use crate::settings::Settings;

    /// Web Audio effects and speech-synthesis announcements
    pub struct WebAudio {
        ctx: Option<AudioContext>,
        /// Low crowd murmur looping under play
        crowd: Option<(OscillatorNode, GainNode)>,
        master_volume: f32,
        sfx_volume: f32,
        crowd_volume: f32,
        voice: bool,
        muted: bool,
    }

    impl Default for WebAudio {
        fn default() -> Self {
            Self::new()
        }
    }

    impl WebAudio {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                crowd: None,
                master_volume: 0.8,
                sfx_volume: 1.0,
                crowd_volume: 0.3,
                voice: true,
                muted: false,
            }
        }

        pub fn with_settings(settings: &Settings) -> Self {
            let mut audio = Self::new();
            audio.apply_settings(settings);
            audio
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.master_volume = settings.master_volume.clamp(0.0, 1.0);
            self.sfx_volume = settings.sfx_volume.clamp(0.0, 1.0);
            self.crowd_volume = settings.crowd_volume.clamp(0.0, 1.0);
            self.voice = settings.voice_enabled;
            self.set_muted(settings.muted);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if muted {
                self.stop_crowd();
                if let Some(synth) = web_sys::window().and_then(|w| w.speech_synthesis().ok()) {
                    synth.cancel();
                }
            }
        }

        /// Flip mute and return the new state
        pub fn toggle_mute(&mut self) -> bool {
            self.set_muted(!self.muted);
            if !self.muted {
                self.start_crowd();
            }
            log::info!("Audio {}", if self.muted { "muted" } else { "unmuted" });
            self.muted
        }

        pub fn is_muted(&self) -> bool {
            self.muted
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn start_crowd(&mut self) {
            let vol = self.master_volume * self.crowd_volume;
            if self.muted || self.crowd.is_some() || vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Triangle) else {
                return;
            };
            gain.gain().set_value(vol * 0.05);
            osc.start().ok();
            self.crowd = Some((osc, gain));
        }

        fn stop_crowd(&mut self) {
            if let Some((osc, gain)) = self.crowd.take() {
                osc.stop().ok();
                gain.disconnect().ok();
            }
        }

        /// Kick - leather thud
        fn play_kick(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 150.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.6, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.frequency().set_value_at_time(150.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(60.0, t + 0.1)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Tackle - dull body bump
        fn play_tackle(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 90.0, OscillatorType::Triangle) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.18)
                .ok();
            osc.frequency().set_value_at_time(90.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(40.0, t + 0.18)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.2).ok();
        }

        /// Mark - bright two-note ding
        fn play_mark(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [600.0, 900.0].iter().enumerate() {
                let delay = i as f64 * 0.08;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Sine) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.25, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.15)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.2).ok();
                }
            }
        }

        /// Goal - rising fanfare
        fn play_goal(&self, ctx: &AudioContext, vol: f32) {
            for (i, freq) in [400.0, 500.0, 600.0, 800.0].iter().enumerate() {
                let delay = i as f64 * 0.1;
                if let Some((osc, gain)) = self.create_osc(ctx, *freq, OscillatorType::Triangle) {
                    let t = ctx.current_time() + delay;
                    gain.gain().set_value_at_time(vol * 0.3, t).ok();
                    gain.gain()
                        .exponential_ramp_to_value_at_time(0.01, t + 0.4)
                        .ok();
                    osc.start_with_when(t).ok();
                    osc.stop_with_when(t + 0.5).ok();
                }
            }
        }

        /// Behind - single soft flag-wave tone
        fn play_behind(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 500.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.25, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.3)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.35).ok();
        }

        /// Siren - long sawtooth wail
        fn play_siren(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 300.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .linear_ramp_to_value_at_time(vol * 0.2, t + 1.2)
                .ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 1.5)
                .ok();
            osc.frequency().set_value_at_time(300.0, t).ok();
            osc.frequency()
                .linear_ramp_to_value_at_time(520.0, t + 0.4)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.5).ok();
        }
    }

    impl AudioSink for WebAudio {
        fn play(&mut self, effect: SoundEffect) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Kick => self.play_kick(ctx, vol),
                SoundEffect::Mark => self.play_mark(ctx, vol),
                SoundEffect::Tackle => self.play_tackle(ctx, vol),
                SoundEffect::Goal => self.play_goal(ctx, vol),
                SoundEffect::Behind => self.play_behind(ctx, vol),
                SoundEffect::Siren => self.play_siren(ctx, vol),
            }
        }

        fn announce(&mut self, phrase: &str) {
            if self.muted || !self.voice {
                return;
            }
            let Some(synth) = web_sys::window().and_then(|w| w.speech_synthesis().ok()) else {
                log::warn!("Speech synthesis unavailable");
                return;
            };
            match SpeechSynthesisUtterance::new_with_text(phrase) {
                Ok(utterance) => {
                    utterance.set_volume(self.master_volume);
                    utterance.set_rate(1.1);
                    synth.speak(&utterance);
                }
                Err(_) => log::warn!("Failed to create utterance"),
            }
        }

        fn resume(&mut self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
            self.start_crowd();
        }

        fn shutdown(&mut self) {
            self.stop_crowd();
            if let Some(synth) = web_sys::window().and_then(|w| w.speech_synthesis().ok()) {
                synth.cancel();
            }
            if let Some(ctx) = self.ctx.take() {
                let _ = ctx.close();
            }
        }
    }
}
