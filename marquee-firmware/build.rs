//! Build script for marquee-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates sign.toml at compile time
//! - Checks that every image asset sign.toml names is present

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Known keys per section, with the kind of value each takes
const SCHEMA: &[(&str, &[(&str, Kind)])] = &[
    (
        "rotation",
        &[
            ("clock_s", Kind::Seconds),
            ("weather_s", Kind::Seconds),
            ("aqi_s", Kind::Seconds),
            ("uvi_s", Kind::Seconds),
            ("pollen_s", Kind::Seconds),
            ("include_pollen", Kind::Bool),
            ("stale_after_s", Kind::Seconds),
        ],
    ),
    (
        "interrupt",
        &[
            ("greet_s", Kind::Seconds),
            ("message_s", Kind::Seconds),
            ("ip_address_s", Kind::Seconds),
            ("splash_s", Kind::Seconds),
        ],
    ),
    (
        "buttons",
        &[
            ("debounce_ms", Kind::Seconds),
            ("long_press_ms", Kind::Seconds),
            ("reboot_delay_s", Kind::Seconds),
        ],
    ),
    ("memory", &[("low_water_bytes", Kind::Seconds)]),
    (
        "network",
        &[
            ("http_port", Kind::Port),
            ("ntp_server", Kind::Text),
            ("ntp_refresh_s", Kind::Seconds),
            ("mqtt_broker", Kind::OptionalText),
            ("mqtt_port", Kind::Port),
            ("mqtt_topic_prefix", Kind::Name),
            ("mqtt_client_id", Kind::Name),
            ("syslog_server", Kind::OptionalText),
        ],
    ),
    (
        "display",
        &[
            ("splash_asset", Kind::Asset),
            ("wifi_asset", Kind::Asset),
            ("status_pixel", Kind::Bool),
        ],
    ),
];

#[derive(Clone, Copy)]
enum Kind {
    /// Non-negative integer
    Seconds,
    /// Integer in 1..=65535
    Port,
    Bool,
    /// Non-empty string up to 64 bytes
    Text,
    /// String up to 64 bytes; empty turns the feature off
    OptionalText,
    /// Non-empty string up to 32 bytes
    Name,
    /// Name of a BMP under assets/, up to 32 bytes
    Asset,
}

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=assets");
    println!("cargo:rerun-if-env-changed=SIGN_ANONYMOUS");
    println!("cargo:rerun-if-env-changed=WIFI_SSID");
    println!("cargo:rerun-if-env-changed=WIFI_PASSWORD");
    println!("cargo:rerun-if-env-changed=MQTT_USERNAME");
    println!("cargo:rerun-if-env-changed=MQTT_PASSWORD");
}

/// Validate sign.toml at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=sign.toml");

    let config_path = Path::new("sign.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: sign.toml not found!                                     ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds sign.toml as its default configuration.     ║\n\
            ║  Please create one in the marquee-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read sign.toml                                 ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in sign.toml                         ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    let errors = validate_sections(&config);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid configuration in sign.toml                       ║\n\
            ╠══════════════════════════════════════════════════════════════════╣\n\
            {}\n\
            ╚══════════════════════════════════════════════════════════════════╝\n",
            errors
                .iter()
                .map(|e| format!("║  • {:<62} ║", e))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }

    println!("cargo:warning=sign.toml validated successfully");
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.len() > 64 {
                format!("{}...", &line[..61])
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Check every section and key against the schema
fn validate_sections(config: &toml::Value) -> Vec<String> {
    let mut errors = Vec::new();

    let Some(root) = config.as_table() else {
        errors.push("top level must be a table".to_string());
        return errors;
    };

    for (section, body) in root {
        let Some(keys) = SCHEMA
            .iter()
            .find(|(name, _)| name == section)
            .map(|(_, keys)| *keys)
        else {
            errors.push(format!("unknown section [{}]", section));
            continue;
        };

        let Some(body) = body.as_table() else {
            errors.push(format!("[{}] must be a table", section));
            continue;
        };

        for (key, value) in body {
            match keys.iter().find(|(name, _)| name == key) {
                Some((_, kind)) => {
                    if let Err(e) = check_value(*kind, value) {
                        errors.push(format!("[{}] {} {}", section, key, e));
                    }
                }
                None => errors.push(format!("[{}] unknown key '{}'", section, key)),
            }
        }
    }

    errors
}

fn check_value(kind: Kind, value: &toml::Value) -> Result<(), String> {
    match (kind, value) {
        (Kind::Seconds, toml::Value::Integer(n)) if *n >= 0 => Ok(()),
        (Kind::Seconds, _) => Err("must be a non-negative integer".to_string()),
        (Kind::Port, toml::Value::Integer(n)) if (1..=65535).contains(n) => Ok(()),
        (Kind::Port, _) => Err("must be 1-65535".to_string()),
        (Kind::Bool, toml::Value::Boolean(_)) => Ok(()),
        (Kind::Bool, _) => Err("must be true or false".to_string()),
        (Kind::Text, toml::Value::String(s)) if !s.is_empty() && s.len() <= 64 => Ok(()),
        (Kind::Text, _) => Err("must be a string of 1-64 bytes".to_string()),
        (Kind::OptionalText, toml::Value::String(s)) if s.len() <= 64 => Ok(()),
        (Kind::OptionalText, _) => Err("must be a string of 0-64 bytes".to_string()),
        (Kind::Name, toml::Value::String(s)) if !s.is_empty() && s.len() <= 32 => Ok(()),
        (Kind::Name, _) => Err("must be a string of 1-32 bytes".to_string()),
        (Kind::Asset, toml::Value::String(s)) if !s.is_empty() && s.len() <= 32 => {
            let path = Path::new("assets").join(format!("{}.bmp", s));
            if path.exists() {
                Ok(())
            } else {
                Err(format!("names missing image {}", path.display()))
            }
        }
        (Kind::Asset, _) => Err("must be a string of 1-32 bytes".to_string()),
    }
}
