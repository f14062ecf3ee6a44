//! Sound and haptic cues for engine events.
//!
//! A terminal has one sound (the bell) and no actuator, so haptic ticks are
//! reported through tracing only.

use std::io::Write;

use crate::core::engine::EngineEvent;

/// One physical cue to emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    Bell,
    Haptic,
}

#[derive(Debug, Clone, Default)]
pub struct Feedback {
    pub sound_enabled: bool,
    pub haptic_enabled: bool,
    bells: u64,
    haptics: u64,
}

impl Feedback {
    pub fn new(sound_enabled: bool, haptic_enabled: bool) -> Self {
        Self {
            sound_enabled,
            haptic_enabled,
            ..Self::default()
        }
    }

    /// Cues produced by an event under the current settings.
    pub fn cues(&self, event: &EngineEvent) -> Vec<Cue> {
        let mut cues = Vec::new();
        match event {
            EngineEvent::FeedbackTick => {
                if self.sound_enabled {
                    cues.push(Cue::Bell);
                }
                if self.haptic_enabled {
                    cues.push(Cue::Haptic);
                }
            }
            EngineEvent::ClickSound => {
                if self.sound_enabled {
                    cues.push(Cue::Bell);
                }
            }
            _ => {}
        }
        cues
    }

    /// Emit the cues for `event`.  Bells are written to `out`.
    pub fn play(&mut self, event: &EngineEvent, out: &mut dyn Write) {
        for cue in self.cues(event) {
            match cue {
                Cue::Bell => {
                    self.bells += 1;
                    if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
                        tracing::warn!("terminal bell: {e}");
                    }
                }
                Cue::Haptic => {
                    self.haptics += 1;
                    tracing::trace!(count = self.haptics, "haptic tick");
                }
            }
        }
    }

    pub fn counts(&self) -> (u64, u64) {
        (self.bells, self.haptics)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_haptic_only() {
        let f = Feedback::new(false, true);
        assert_eq!(f.cues(&EngineEvent::FeedbackTick), vec![Cue::Haptic]);
        assert!(f.cues(&EngineEvent::ClickSound).is_empty());
    }

    #[test]
    fn sound_rings_the_bell_for_ticks_and_clicks() {
        let mut f = Feedback::new(true, false);
        let mut out: Vec<u8> = Vec::new();
        f.play(&EngineEvent::FeedbackTick, &mut out);
        f.play(&EngineEvent::ClickSound, &mut out);
        f.play(&EngineEvent::PutBack("a".into()), &mut out);
        assert_eq!(out, b"\x07\x07");
        assert_eq!(f.counts(), (2, 0));
    }
}
