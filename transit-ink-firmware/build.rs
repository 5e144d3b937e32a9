//! Build script for transit-ink-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Locates the CYW43 radio firmware blobs
//! - Validates settings.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Blobs expected in the radio firmware directory
const CYW43_BLOBS: [(&str, &str); 2] = [
    ("CYW43_FIRMWARE", "43439A0.bin"),
    ("CYW43_CLM", "43439A0_clm.bin"),
];

fn main() {
    setup_linker();
    locate_radio_firmware();
    validate_settings();
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

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Export the paths of the CYW43 firmware and CLM blobs
///
/// The blobs ship with the embassy repository (`cyw43-firmware/`). Point
/// `CYW43_FIRMWARE_DIR` at that directory; it defaults to
/// `../cyw43-firmware` relative to this crate.
fn locate_radio_firmware() {
    println!("cargo:rerun-if-env-changed=CYW43_FIRMWARE_DIR");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap());
    let dir = env::var("CYW43_FIRMWARE_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| manifest_dir.join("../cyw43-firmware"));

    for (var, file) in CYW43_BLOBS {
        let path = dir.join(file);
        if !path.exists() {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: CYW43 radio firmware not found                           ║\n\
                ║                                                                  ║\n\
                ║  Missing: {:<54} ║\n\
                ║                                                                  ║\n\
                ║  Copy cyw43-firmware/ from the embassy repository next to the    ║\n\
                ║  workspace, or set CYW43_FIRMWARE_DIR.                           ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                file
            );
        }
        println!("cargo:rerun-if-changed={}", path.display());
        println!("cargo:rustc-env={}={}", var, path.display());
    }
}

/// Validate settings.toml at compile time
///
/// Syntax errors and bad values stop the build. Missing Wi-Fi credentials
/// only warn: the firmware refuses to start without them, and a template
/// checked into git has none.
fn validate_settings() {
    // Re-run if settings.toml changes
    println!("cargo:rerun-if-changed=settings.toml");

    let settings_path = Path::new("settings.toml");

    if !settings_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: settings.toml not found!                                 ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a settings.toml with the Wi-Fi credentials  ║\n\
            ║  and the departures endpoint. Create one in the                  ║\n\
            ║  transit-ink-firmware directory.                                 ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(settings_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read settings.toml                             ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let settings: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in settings.toml                     ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n\
                \n{}\n",
                e
            );
        }
    };

    let mut errors = Vec::new();

    for (key, value) in &settings {
        if value.is_table() || value.is_array() {
            errors.push(format!("{} must be a plain string or integer", key));
        }
    }

    let credential = |keys: [&str; 2]| {
        keys.iter()
            .filter_map(|k| settings.get(*k).and_then(|v| v.as_str()))
            .any(|v| !v.is_empty())
    };
    if !credential(["WIFI_SSID", "CIRCUITPY_WIFI_SSID"])
        || !credential(["WIFI_PASSWORD", "CIRCUITPY_WIFI_PASSWORD"])
    {
        println!(
            "cargo:warning=settings.toml has no Wi-Fi credentials; set WIFI_SSID and WIFI_PASSWORD or the board will halt at startup"
        );
    }

    if settings.get("TRANSIT_ENDPOINT").and_then(|v| v.as_str()).is_none() {
        println!("cargo:warning=settings.toml has no TRANSIT_ENDPOINT; every refresh will fail");
    }

    if let Some(value) = settings.get("REFRESH_INTERVAL") {
        match value.as_integer() {
            Some(secs) if (1..=86_400).contains(&secs) => {}
            _ => errors.push("REFRESH_INTERVAL must be an integer from 1 to 86400".to_string()),
        }
    }

    if let Some(value) = settings.get("DISPLAY_ROTATION") {
        match value.as_integer() {
            Some(turns) if (0..=3).contains(&turns) => {}
            _ => errors.push("DISPLAY_ROTATION must be 0, 1, 2 or 3".to_string()),
        }
    }

    if let Some(value) = settings.get("LINE_COLORS") {
        match value.as_str() {
            Some("highlight") | Some("alternating") => {}
            _ => errors.push("LINE_COLORS must be \"highlight\" or \"alternating\"".to_string()),
        }
    }

    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid settings                                         ║\n\
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
}
