//! Minimal TOML reader for `sign.toml`
//!
//! Handles only what the sign configuration uses:
//! - `[section]` headers
//! - `key = value` with integer, boolean or double-quoted string values
//! - `#` comments, whole-line or trailing
//!
//! Unknown sections and keys are errors, so a typo does not silently
//! fall back to a default.

use heapless::String;

use super::types::SignConfig;

/// Parse error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Header names no known section
    InvalidSection,
    /// Key is not known in its section, or appears before any section
    UnknownKey,
    /// Line is not a header or `key = value`
    Syntax,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// String longer than its field allows
    TooLong,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Rotation,
    Interrupt,
    Buttons,
    Memory,
    Network,
    Display,
}

/// Parse `sign.toml` text, starting from the defaults
pub fn parse_config(input: &str) -> Result<SignConfig, ParseError> {
    let mut config = SignConfig::default();
    let mut section = Section::Root;

    for line in input.lines() {
        let line = strip_comment(line).trim();

        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') {
            let header = line
                .strip_prefix('[')
                .and_then(|l| l.strip_suffix(']'))
                .ok_or(ParseError::Syntax)?;
            section = parse_section_header(header)?;
            continue;
        }

        let (key, value) = line.split_once('=').ok_or(ParseError::Syntax)?;
        apply_value(&mut config, section, key.trim(), value.trim())?;
    }

    Ok(config)
}

/// Drop a trailing comment, leaving `#` inside quotes alone
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    match header.trim() {
        "rotation" => Ok(Section::Rotation),
        "interrupt" => Ok(Section::Interrupt),
        "buttons" => Ok(Section::Buttons),
        "memory" => Ok(Section::Memory),
        "network" => Ok(Section::Network),
        "display" => Ok(Section::Display),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    config: &mut SignConfig,
    section: Section,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match (section, key) {
        (Section::Rotation, "clock_s") => config.rotation.clock_s = parse_u64(value)?,
        (Section::Rotation, "weather_s") => config.rotation.weather_s = parse_u64(value)?,
        (Section::Rotation, "aqi_s") => config.rotation.aqi_s = parse_u64(value)?,
        (Section::Rotation, "uvi_s") => config.rotation.uvi_s = parse_u64(value)?,
        (Section::Rotation, "pollen_s") => config.rotation.pollen_s = parse_u64(value)?,
        (Section::Rotation, "include_pollen") => {
            config.rotation.include_pollen = parse_bool(value)?
        }
        (Section::Rotation, "stale_after_s") => config.rotation.stale_after_s = parse_u64(value)?,

        (Section::Interrupt, "greet_s") => config.interrupt.greet_s = parse_u64(value)?,
        (Section::Interrupt, "message_s") => config.interrupt.message_s = parse_u64(value)?,
        (Section::Interrupt, "ip_address_s") => config.interrupt.ip_address_s = parse_u64(value)?,
        (Section::Interrupt, "splash_s") => config.interrupt.splash_s = parse_u64(value)?,

        (Section::Buttons, "debounce_ms") => config.buttons.debounce_ms = parse_u64(value)?,
        (Section::Buttons, "long_press_ms") => config.buttons.long_press_ms = parse_u64(value)?,
        (Section::Buttons, "reboot_delay_s") => config.buttons.reboot_delay_s = parse_u64(value)?,

        (Section::Memory, "low_water_bytes") => {
            config.memory.low_water_bytes =
                usize::try_from(parse_u64(value)?).map_err(|_| ParseError::InvalidValue)?
        }

        (Section::Network, "http_port") => {
            config.network.http_port =
                u16::try_from(parse_u64(value)?).map_err(|_| ParseError::InvalidValue)?
        }
        (Section::Network, "ntp_server") => config.network.ntp_server = parse_string(value)?,
        (Section::Network, "ntp_refresh_s") => config.network.ntp_refresh_s = parse_u64(value)?,
        (Section::Network, "mqtt_broker") => config.network.mqtt_broker = parse_string(value)?,
        (Section::Network, "mqtt_port") => {
            config.network.mqtt_port =
                u16::try_from(parse_u64(value)?).map_err(|_| ParseError::InvalidValue)?
        }
        (Section::Network, "mqtt_topic_prefix") => {
            config.network.mqtt_topic_prefix = parse_string(value)?
        }
        (Section::Network, "mqtt_client_id") => {
            config.network.mqtt_client_id = parse_string(value)?
        }
        (Section::Network, "syslog_server") => config.network.syslog_server = parse_string(value)?,

        (Section::Display, "splash_asset") => config.display.splash_asset = parse_string(value)?,
        (Section::Display, "wifi_asset") => config.display.wifi_asset = parse_string(value)?,
        (Section::Display, "status_pixel") => config.display.status_pixel = parse_bool(value)?,

        _ => return Err(ParseError::UnknownKey),
    }
    Ok(())
}

fn parse_u64(value: &str) -> Result<u64, ParseError> {
    // TOML allows underscores as digit separators
    let mut n: u64 = 0;
    let mut digits = 0;
    for ch in value.chars() {
        match ch {
            '_' if digits > 0 => {}
            '0'..='9' => {
                n = n
                    .checked_mul(10)
                    .and_then(|n| n.checked_add(u64::from(ch as u8 - b'0')))
                    .ok_or(ParseError::InvalidValue)?;
                digits += 1;
            }
            _ => return Err(ParseError::InvalidValue),
        }
    }
    if digits == 0 {
        return Err(ParseError::InvalidValue);
    }
    Ok(n)
}

fn parse_bool(value: &str) -> Result<bool, ParseError> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseError::InvalidValue),
    }
}

fn parse_string<const N: usize>(value: &str) -> Result<String<N>, ParseError> {
    let inner = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseError::InvalidValue)?;
    let mut s = String::new();
    s.push_str(inner).map_err(|_| ParseError::TooLong)?;
    Ok(s)
}
