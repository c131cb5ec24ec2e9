//! Cue playback. Tones are synthesised once during backend setup.
//!
//! Without the `audio` feature cues are only logged.

#[cfg(feature = "audio")]
pub(crate) use self::playback::CuePlayer;
#[cfg(not(feature = "audio"))]
pub(crate) use self::silent::CuePlayer;

#[cfg(feature = "audio")]
mod playback {
    use anyhow::{anyhow, Result};
    use lane_defence_core::Cue;
    use lane_defence_rendering::audio;
    use macroquad::audio::{load_sound_from_bytes, play_sound_once, Sound};
    use tracing::debug;

    pub(crate) struct CuePlayer {
        sounds: Vec<(Cue, Sound)>,
    }

    impl CuePlayer {
        pub(crate) async fn load() -> Result<Self> {
            let mut sounds = Vec::with_capacity(Cue::ALL.len());
            for cue in Cue::ALL {
                let clip = audio::cue_clip(cue);
                let sound = load_sound_from_bytes(&clip)
                    .await
                    .map_err(|error| anyhow!("failed to load the {cue:?} tone: {error:?}"))?;
                sounds.push((cue, sound));
            }
            debug!(count = sounds.len(), "cue tones loaded");
            Ok(Self { sounds })
        }

        pub(crate) fn play(&self, cue: Cue) {
            if let Some((_, sound)) = self.sounds.iter().find(|(candidate, _)| *candidate == cue) {
                play_sound_once(*sound);
            }
        }
    }
}

#[cfg(not(feature = "audio"))]
mod silent {
    use anyhow::Result;
    use lane_defence_core::Cue;
    use tracing::debug;

    pub(crate) struct CuePlayer;

    impl CuePlayer {
        pub(crate) async fn load() -> Result<Self> {
            Ok(Self)
        }

        pub(crate) fn play(&self, cue: Cue) {
            debug!(?cue, "audio disabled, cue not played");
        }
    }
}
