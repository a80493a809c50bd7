//! Background music on/off control
//!
//! The pond only knows whether music is playing. Playback itself is an
//! external collaborator behind `MusicBackend`; on the web that is the page's
//! `<audio id="music">` element, which may have no source at all.

use std::fmt;

/// Whether the music is believed to be playing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MusicState {
    #[default]
    Paused,
    Playing,
}

/// Music playback failures
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// Nothing to play
    NoSource,
    /// The player refused or failed to start
    Playback(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoSource => write!(f, "no music source configured"),
            AudioError::Playback(reason) => write!(f, "music playback failed: {reason}"),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can play and pause a looping track
pub trait MusicBackend {
    fn has_source(&self) -> bool;
    /// Start playback. May still fail later; see `MusicControl::playback_failed`.
    fn play(&mut self) -> Result<(), AudioError>;
    fn pause(&mut self);
    fn set_volume(&mut self, volume: f32);
}

/// On/off toggle around a music backend
pub struct MusicControl<B: MusicBackend> {
    backend: B,
    state: MusicState,
}

impl<B: MusicBackend> MusicControl<B> {
    pub fn new(mut backend: B, volume: f32) -> Self {
        backend.set_volume(volume.clamp(0.0, 1.0));
        Self {
            backend,
            state: MusicState::Paused,
        }
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Flip between playing and paused. Failures leave the music paused.
    pub fn toggle(&mut self) -> MusicState {
        self.state = match self.state {
            MusicState::Playing => {
                self.backend.pause();
                MusicState::Paused
            }
            MusicState::Paused => match self.start() {
                Ok(()) => MusicState::Playing,
                Err(e) => {
                    log::warn!("{e}");
                    MusicState::Paused
                }
            },
        };
        self.state
    }

    fn start(&mut self) -> Result<(), AudioError> {
        if !self.backend.has_source() {
            return Err(AudioError::NoSource);
        }
        self.backend.play()
    }

    /// Asynchronous playback failure reported after `toggle` returned
    pub fn playback_failed(&mut self, reason: &str) {
        log::warn!("{}", AudioError::Playback(reason.to_string()));
        self.state = MusicState::Paused;
    }

    /// The track ended on its own
    pub fn ended(&mut self) {
        self.state = MusicState::Paused;
    }

    /// Button caption for the current state
    pub fn label(&self) -> &'static str {
        match self.state {
            MusicState::Playing => "🔊 Pause Music",
            MusicState::Paused => "🔇 Play Music",
        }
    }
}

/// `<audio>` element backend
#[cfg(target_arch = "wasm32")]
pub mod web {
    use super::{AudioError, MusicBackend};
    use web_sys::HtmlAudioElement;

    pub struct ElementMusic {
        element: HtmlAudioElement,
        /// Promise from the last `play()`, awaited by the caller
        pending: Option<js_sys::Promise>,
    }

    impl ElementMusic {
        pub fn new(element: HtmlAudioElement) -> Self {
            element.set_loop(true);
            Self {
                element,
                pending: None,
            }
        }

        pub fn element(&self) -> &HtmlAudioElement {
            &self.element
        }

        pub fn take_pending(&mut self) -> Option<js_sys::Promise> {
            self.pending.take()
        }
    }

    impl MusicBackend for ElementMusic {
        fn has_source(&self) -> bool {
            let src = self.element.current_src();
            let page = web_sys::window()
                .and_then(|w| w.location().href().ok())
                .unwrap_or_default();
            !src.is_empty() && src != page
        }

        fn play(&mut self) -> Result<(), AudioError> {
            let promise = self
                .element
                .play()
                .map_err(|e| AudioError::Playback(format!("{e:?}")))?;
            self.pending = Some(promise);
            Ok(())
        }

        fn pause(&mut self) {
            let _ = self.element.pause();
        }

        fn set_volume(&mut self, volume: f32) {
            self.element.set_volume(volume as f64);
        }
    }
}

/// Backend with no output, used by the native headless run. Without a
/// source it behaves like a page whose `<audio>` has no file.
#[derive(Debug, Default)]
pub struct SilentMusic {
    pub source: bool,
    pub volume: f32,
}

impl MusicBackend for SilentMusic {
    fn has_source(&self) -> bool {
        self.source
    }

    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }

    fn pause(&mut self) {}

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct FakePlayer {
        source: bool,
        refuse: bool,
        playing: bool,
        volume: f32,
    }

    impl MusicBackend for FakePlayer {
        fn has_source(&self) -> bool {
            self.source
        }

        fn play(&mut self) -> Result<(), AudioError> {
            if self.refuse {
                return Err(AudioError::Playback("blocked".into()));
            }
            self.playing = true;
            Ok(())
        }

        fn pause(&mut self) {
            self.playing = false;
        }

        fn set_volume(&mut self, volume: f32) {
            self.volume = volume;
        }
    }

    #[test]
    fn test_toggle_on_and_off() {
        let player = FakePlayer {
            source: true,
            ..Default::default()
        };
        let mut music = MusicControl::new(player, 0.7);
        assert_eq!(music.backend_mut().volume, 0.7);
        assert_eq!(music.toggle(), MusicState::Playing);
        assert!(music.backend_mut().playing);
        assert_eq!(music.label(), "🔊 Pause Music");
        assert_eq!(music.toggle(), MusicState::Paused);
        assert!(!music.backend_mut().playing);
    }

    #[test]
    fn test_no_source_stays_paused() {
        let mut music = MusicControl::new(FakePlayer::default(), 1.0);
        assert_eq!(music.toggle(), MusicState::Paused);
        assert!(!music.backend_mut().playing);
        assert_eq!(music.label(), "🔇 Play Music");
    }

    #[test]
    fn test_refused_playback_reverts() {
        let player = FakePlayer {
            source: true,
            refuse: true,
            ..Default::default()
        };
        let mut music = MusicControl::new(player, 1.0);
        assert_eq!(music.toggle(), MusicState::Paused);
    }

    #[test]
    fn test_late_failure_and_end_revert() {
        let player = FakePlayer {
            source: true,
            ..Default::default()
        };
        let mut music = MusicControl::new(player, 1.0);
        music.toggle();
        music.playback_failed("NotAllowedError");
        assert_eq!(music.state(), MusicState::Paused);

        music.toggle();
        music.ended();
        assert_eq!(music.state(), MusicState::Paused);
    }

    #[test]
    fn test_silent_backend_follows_source() {
        let mut music = MusicControl::new(SilentMusic::default(), 0.7);
        assert_eq!(music.toggle(), MusicState::Paused);
        assert_eq!(music.backend_mut().volume, 0.7);

        music.backend_mut().source = true;
        assert_eq!(music.toggle(), MusicState::Playing);
        assert_eq!(music.toggle(), MusicState::Paused);
    }

    #[test]
    fn test_volume_is_clamped() {
        let mut music = MusicControl::new(SilentMusic::default(), 4.0);
        assert_eq!(music.backend_mut().volume, 1.0);
    }
}
