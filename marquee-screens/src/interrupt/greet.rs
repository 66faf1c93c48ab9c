//! Greeting for someone who just arrived
//!
//! The `greet` key holds `{"person": "John R.", "door": "front"}`. Only
//! the first name is shown. People on the anonymous list get a generic
//! greeting instead.

use heapless::{String, Vec};
use marquee_core::data::{keys, Value};
use marquee_core::traits::{Screen, ScreenContext, ScreenError, ShowOutcome};
use marquee_display::{Color, Font, LABEL_LEN};

/// Maximum names on the anonymous list
pub const MAX_ANONYMOUS: usize = 8;

/// Maximum length of one anonymous name
pub const NAME_LEN: usize = 32;

const GREETING_COLOR: Color = Color::GREEN;
const NAME_COLOR: Color = Color(0x0080FF);

/// Greeting screen
#[derive(Debug, Clone, Default)]
pub struct Greet {
    anonymous: Vec<String<NAME_LEN>, MAX_ANONYMOUS>,
}

impl Greet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a comma-separated list of people to greet anonymously
    ///
    /// Names past the list capacity, and names too long to match, are
    /// ignored.
    pub fn with_anonymous(list: &str) -> Self {
        let mut greet = Self::new();
        for name in list.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            let mut entry = String::new();
            if entry.push_str(name).is_ok() && greet.anonymous.push(entry).is_err() {
                break;
            }
        }
        greet
    }

    fn is_anonymous(&self, person: &str) -> bool {
        self.anonymous.iter().any(|name| name.as_str() == person)
    }
}

impl Screen for Greet {
    fn show(&mut self, ctx: &mut ScreenContext<'_>) -> Result<ShowOutcome, ScreenError> {
        if !ctx.data.is_updated(keys::GREET) {
            return Ok(ShowOutcome::NoData);
        }
        ctx.data.clear_updated(keys::GREET);

        let Some(person) = ctx
            .data
            .get_item(keys::GREET)
            .and_then(|greet| greet.get("person"))
            .and_then(Value::as_str)
        else {
            return Ok(ShowOutcome::Malformed);
        };

        let (greeting, name) = if self.is_anonymous(person) {
            ("Hi totally", "human being")
        } else {
            ("Welcome", person.split(' ').next().unwrap_or(person))
        };
        let mut first: String<LABEL_LEN> = String::new();
        for ch in name.chars() {
            if first.push(ch).is_err() {
                break;
            }
        }

        ctx.scene.clear();
        ctx.scene.add_label(greeting, Font::Small, GREETING_COLOR, 0, 3)?;
        ctx.scene.add_label(&first, Font::Small, NAME_COLOR, 0, 19)?;
        Ok(ShowOutcome::Shown)
    }
}
