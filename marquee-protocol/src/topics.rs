//! Data topics
//!
//! Every topic is both an HTTP endpoint (`POST /<key>`) and a key in the
//! sign's data store.

/// A data store key that external systems may write
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Topic {
    Aqi,
    Debug,
    Forecast,
    Greet,
    Image,
    Lunar,
    Message,
    Ntp,
    Pollen,
    Solar,
    Timezone,
    Tones,
    Trimet,
    Uv,
    Weather,
}

impl Topic {
    /// Every topic, in key order
    pub const ALL: [Topic; 15] = [
        Topic::Aqi,
        Topic::Debug,
        Topic::Forecast,
        Topic::Greet,
        Topic::Image,
        Topic::Lunar,
        Topic::Message,
        Topic::Ntp,
        Topic::Pollen,
        Topic::Solar,
        Topic::Timezone,
        Topic::Tones,
        Topic::Trimet,
        Topic::Uv,
        Topic::Weather,
    ];

    /// Data store key for this topic
    pub const fn key(self) -> &'static str {
        match self {
            Topic::Aqi => "aqi",
            Topic::Debug => "debug",
            Topic::Forecast => "forecast",
            Topic::Greet => "greet",
            Topic::Image => "image",
            Topic::Lunar => "lunar",
            Topic::Message => "message",
            Topic::Ntp => "ntp",
            Topic::Pollen => "pollen",
            Topic::Solar => "solar",
            Topic::Timezone => "timezone",
            Topic::Tones => "tones",
            Topic::Trimet => "trimet",
            Topic::Uv => "uv",
            Topic::Weather => "weather",
        }
    }

    /// Look up a topic by key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|t| t.key() == key)
    }

    /// Position of this topic in [`Topic::ALL`]
    ///
    /// Used as the flash slot of the topic's record; reordering `ALL`
    /// orphans stored records.
    pub fn slot(self) -> u8 {
        Self::ALL.iter().position(|&t| t == self).unwrap_or(0) as u8
    }
}
