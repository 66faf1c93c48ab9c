//! Non-blocking tone sequencer

use heapless::Vec;
use marquee_core::data::payload::as_seconds;
use marquee_core::data::{keys, DataStore, Value};
use marquee_hal::{duty_for_volume, ToneOutput};

/// Longest sequence kept; extra entries are dropped
pub const MAX_TONES: usize = 16;

/// One note
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Tone {
    pub frequency_hz: u32,
    pub duration_ms: u64,
    /// Percent of full volume
    pub volume: u8,
}

impl Tone {
    fn from_value(value: &Value) -> Option<Self> {
        let frequency_hz = as_seconds(value.get("frequency")?)?;
        let duration_s = value.get("duration")?.as_f64()?;
        let volume = as_seconds(value.get("volume")?)?;
        if !duration_s.is_finite() || duration_s < 0.0 {
            return None;
        }
        Some(Self {
            frequency_hz: u32::try_from(frequency_hz).ok()?,
            duration_ms: (duration_s * 1000.0) as u64,
            volume: volume.min(100) as u8,
        })
    }
}

/// Plays a pushed sequence one note after another
#[derive(Debug, Clone, Default)]
pub struct Tones {
    tones: Vec<Tone, MAX_TONES>,
    /// Index of the next note; `None` when idle
    next: Option<usize>,
    play_until_ms: u64,
}

impl Tones {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the sequence from the store and start it at `now_ms`
    ///
    /// Returns false when there is nothing to play. Malformed notes are
    /// skipped.
    pub fn play(&mut self, data: &mut DataStore, now_ms: u64) -> bool {
        let Some(list) = data
            .get_item(keys::TONES)
            .and_then(|t| t.get("tones"))
            .and_then(Value::as_array)
        else {
            return false;
        };

        self.tones.clear();
        for tone in list.iter().filter_map(Tone::from_value) {
            if self.tones.push(tone).is_err() {
                break;
            }
        }
        data.clear_updated(keys::TONES);

        self.next = Some(0);
        self.play_until_ms = now_ms;
        true
    }

    /// Whether a sequence is in progress
    pub fn is_playing(&self) -> bool {
        self.next.is_some()
    }

    /// Advance the sequence; call every tick
    pub fn update<T: ToneOutput>(&mut self, now_ms: u64, out: &mut T) {
        let Some(index) = self.next else {
            return;
        };
        if self.play_until_ms > now_ms {
            return;
        }

        match self.tones.get(index) {
            Some(tone) => {
                out.set_tone(tone.frequency_hz, duty_for_volume(tone.volume));
                self.play_until_ms = now_ms.saturating_add(tone.duration_ms);
                self.next = Some(index + 1);
            }
            None => {
                out.silence();
                self.next = None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use marquee_hal::tone::MAX_DUTY;
    use serde_json::json;

    #[derive(Default)]
    struct Buzzer {
        playing: Option<(u32, u16)>,
        changes: u32,
    }

    impl ToneOutput for Buzzer {
        fn set_tone(&mut self, frequency_hz: u32, duty: u16) {
            self.playing = Some((frequency_hz, duty));
            self.changes += 1;
        }

        fn silence(&mut self) {
            self.playing = None;
            self.changes += 1;
        }
    }

    #[test]
    fn test_nothing_to_play() {
        let mut data = DataStore::new();
        let mut tones = Tones::new();
        assert!(!tones.play(&mut data, 0));
        assert!(!tones.is_playing());
    }

    #[test]
    fn test_sequence_plays_in_order() {
        let mut data = DataStore::new();
        data.set_item(
            keys::TONES,
            json!({"tones": [
                {"frequency": 400, "duration": 0.5, "volume": 100},
                {"frequency": 5500, "duration": 1.25, "volume": 50}
            ]}),
            1,
        );
        let mut tones = Tones::new();
        let mut buzzer = Buzzer::default();

        assert!(tones.play(&mut data, 1000));
        assert!(!data.is_updated(keys::TONES));

        tones.update(1000, &mut buzzer);
        assert_eq!(buzzer.playing, Some((400, MAX_DUTY)));

        tones.update(1499, &mut buzzer);
        assert_eq!(buzzer.changes, 1);

        tones.update(1500, &mut buzzer);
        assert_eq!(buzzer.playing, Some((5500, MAX_DUTY / 2)));

        tones.update(2750, &mut buzzer);
        assert_eq!(buzzer.playing, None);
        assert!(!tones.is_playing());

        tones.update(5000, &mut buzzer);
        assert_eq!(buzzer.changes, 3);
    }

    #[test]
    fn test_malformed_notes_skipped() {
        let mut data = DataStore::new();
        data.set_item(
            keys::TONES,
            json!({"tones": [{"frequency": 400}, {"frequency": 800, "duration": 0.1, "volume": 20}]}),
            1,
        );
        let mut tones = Tones::new();
        let mut buzzer = Buzzer::default();
        tones.play(&mut data, 0);
        tones.update(0, &mut buzzer);
        assert_eq!(buzzer.playing, Some((800, duty_for_volume(20))));
    }
}
