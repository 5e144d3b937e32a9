//! Board settings
//!
//! Settings are read once at startup from a `settings.toml` file using the
//! same keys CircuitPython boards use for their environment. Wi-Fi
//! credentials are mandatory; everything else has a default.
//!
//! | Key | Default | Notes |
//! |-----|---------|-------|
//! | `WIFI_SSID` | required | alias `CIRCUITPY_WIFI_SSID` |
//! | `WIFI_PASSWORD` | required | alias `CIRCUITPY_WIFI_PASSWORD` |
//! | `TRANSIT_ENDPOINT` | none | not validated; every fetch fails without it |
//! | `REFRESH_INTERVAL` | 180 | seconds, 1..=86400 |
//! | `DISPLAY_ROTATION` | 3 | quarter turns, 0..=3 |
//! | `LINE_COLORS` | `"highlight"` | or `"alternating"` |

use core::fmt;

use heapless::String;

use super::parser::{entries, parse_int, parse_string, ParseError};
use crate::layout::LineColors;
use crate::traits::Rotation;

/// Maximum SSID length (802.11 limit)
pub const MAX_SSID_LEN: usize = 32;

/// Maximum WPA passphrase length
pub const MAX_PASSWORD_LEN: usize = 64;

/// Maximum endpoint URL length
pub const MAX_ENDPOINT_LEN: usize = 256;

/// Default refresh interval (minimum safe refresh period for the panel)
pub const DEFAULT_REFRESH_INTERVAL_S: u32 = 180;

/// Longest accepted refresh interval
pub const MAX_REFRESH_INTERVAL_S: u32 = 86_400;

/// Default rotation: landscape, connector on the left
pub const DEFAULT_ROTATION: Rotation = Rotation::Rotate270;

pub const KEY_SSID: &str = "WIFI_SSID";
pub const KEY_PASSWORD: &str = "WIFI_PASSWORD";
pub const KEY_ENDPOINT: &str = "TRANSIT_ENDPOINT";
pub const KEY_REFRESH_INTERVAL: &str = "REFRESH_INTERVAL";
pub const KEY_ROTATION: &str = "DISPLAY_ROTATION";
pub const KEY_LINE_COLORS: &str = "LINE_COLORS";

/// Settings errors
///
/// All of these are fatal at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingsError {
    /// `WIFI_SSID` missing or empty
    MissingSsid,
    /// `WIFI_PASSWORD` missing or empty
    MissingPassword,
    /// Malformed line
    Syntax { line: usize },
    /// Value longer than its buffer
    TooLong { key: &'static str },
    /// Value of the wrong type or out of range
    InvalidValue { key: &'static str },
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::MissingSsid | SettingsError::MissingPassword => {
                f.write_str("Set WIFI_SSID and WIFI_PASSWORD in settings.toml")
            }
            SettingsError::Syntax { line } => write!(f, "settings.toml line {}: expected KEY = value", line),
            SettingsError::TooLong { key } => write!(f, "{} is too long", key),
            SettingsError::InvalidValue { key } => write!(f, "{} has an invalid value", key),
        }
    }
}

/// Startup settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub ssid: String<MAX_SSID_LEN>,
    pub password: String<MAX_PASSWORD_LEN>,
    pub endpoint: Option<String<MAX_ENDPOINT_LEN>>,
    pub refresh_interval_s: u32,
    pub rotation: Rotation,
    pub line_colors: LineColors,
}

impl Settings {
    /// Parse a settings file
    ///
    /// Unknown keys are ignored so the same file can carry settings for
    /// other tools. Later duplicates override earlier ones.
    pub fn parse(input: &str) -> Result<Self, SettingsError> {
        let mut ssid: Option<String<MAX_SSID_LEN>> = None;
        let mut password: Option<String<MAX_PASSWORD_LEN>> = None;
        let mut endpoint: Option<String<MAX_ENDPOINT_LEN>> = None;
        let mut refresh_interval_s = DEFAULT_REFRESH_INTERVAL_S;
        let mut rotation = DEFAULT_ROTATION;
        let mut line_colors = LineColors::default();

        for entry in entries(input) {
            let entry = entry.map_err(|(line, _)| SettingsError::Syntax { line })?;

            match entry.key {
                "WIFI_SSID" | "CIRCUITPY_WIFI_SSID" => {
                    ssid = Some(string_value(KEY_SSID, entry.value)?);
                }
                "WIFI_PASSWORD" | "CIRCUITPY_WIFI_PASSWORD" => {
                    password = Some(string_value(KEY_PASSWORD, entry.value)?);
                }
                "TRANSIT_ENDPOINT" => {
                    let url: String<MAX_ENDPOINT_LEN> = string_value(KEY_ENDPOINT, entry.value)?;
                    endpoint = (!url.is_empty()).then_some(url);
                }
                "REFRESH_INTERVAL" => {
                    let secs: u32 = parse_int(entry.value).map_err(|_| invalid(KEY_REFRESH_INTERVAL))?;
                    if secs == 0 || secs > MAX_REFRESH_INTERVAL_S {
                        return Err(invalid(KEY_REFRESH_INTERVAL));
                    }
                    refresh_interval_s = secs;
                }
                "DISPLAY_ROTATION" => {
                    let turns: u8 = parse_int(entry.value).map_err(|_| invalid(KEY_ROTATION))?;
                    rotation = Rotation::from_quarter_turns(turns).ok_or(invalid(KEY_ROTATION))?;
                }
                "LINE_COLORS" => {
                    let policy: String<16> = string_value(KEY_LINE_COLORS, entry.value)?;
                    line_colors = match policy.as_str() {
                        "highlight" => LineColors::Highlight,
                        "alternating" => LineColors::Alternating,
                        _ => return Err(invalid(KEY_LINE_COLORS)),
                    };
                }
                _ => {}
            }
        }

        let ssid = ssid
            .filter(|s| !s.is_empty())
            .ok_or(SettingsError::MissingSsid)?;
        let password = password
            .filter(|p| !p.is_empty())
            .ok_or(SettingsError::MissingPassword)?;

        Ok(Self {
            ssid,
            password,
            endpoint,
            refresh_interval_s,
            rotation,
            line_colors,
        })
    }

    /// Endpoint URL, if configured
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Refresh interval in milliseconds
    pub const fn refresh_interval_ms(&self) -> u32 {
        self.refresh_interval_s * 1000
    }
}

fn invalid(key: &'static str) -> SettingsError {
    SettingsError::InvalidValue { key }
}

fn string_value<const N: usize>(key: &'static str, value: &str) -> Result<String<N>, SettingsError> {
    parse_string(value).map_err(|e| match e {
        ParseError::TooLong => SettingsError::TooLong { key },
        _ => SettingsError::InvalidValue { key },
    })
}
