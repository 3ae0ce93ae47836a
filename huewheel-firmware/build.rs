//! Build script for huewheel-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates profile.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Largest chunk stride the wire encoder accepts
const MAX_STRIDE: u32 = 192;
/// Largest palette the firmware supports
const MAX_COLORS: usize = 32;

const PRESETS: [&str; 3] = ["checker16", "bands32", "bands6"];

fn main() {
    setup_linker();
    validate_profile();
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

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileFile {
    #[serde(default)]
    profile: ProfileSection,
    #[serde(default)]
    palette: PaletteSection,
    #[serde(default)]
    rotation: RotationSection,
    #[serde(default)]
    stream: StreamSection,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProfileSection {
    preset: Option<String>,
    name: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    tick_ms: Option<u32>,
    painter: Option<String>,
    band_width: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct PaletteSection {
    format: Option<String>,
    colors: Option<Vec<u32>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RotationSection {
    zone_start: Option<u32>,
    zone_end: Option<u32>,
    modulus: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct StreamSection {
    frame_stride: Option<u32>,
    palette_stride: Option<u32>,
    #[allow(dead_code)] // type checked by serde only
    separator: Option<bool>,
    on_click: Option<String>,
    on_rotate: Option<String>,
}

/// Validate profile.toml at compile time
///
/// Catches typos and out-of-range values here; cross-field checks against
/// the preset's defaults happen again on the device.
fn validate_profile() {
    println!("cargo:rerun-if-changed=profile.toml");

    let path = Path::new("profile.toml");
    if !path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: profile.toml not found!                                  ║\n\
            ║                                                                  ║\n\
            ║  The firmware embeds a deployment profile at build time.         ║\n\
            ║  Please create one in the huewheel-firmware directory.           ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read profile.toml                              ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let file: ProfileFile = match toml::from_str(&content) {
        Ok(file) => file,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid profile.toml                                     ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    let errors = check_ranges(&file);
    if !errors.is_empty() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: Invalid values in profile.toml                           ║\n\
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

    println!("cargo:warning=profile.toml validated successfully");
}

fn check_ranges(file: &ProfileFile) -> Vec<String> {
    let mut errors = Vec::new();
    let one_of = |errors: &mut Vec<String>, key: &str, value: &Option<String>, allowed: &[&str]| {
        if let Some(v) = value {
            if !allowed.contains(&v.as_str()) {
                errors.push(format!("{} must be one of {}", key, allowed.join(", ")));
            }
        }
    };

    let profile = &file.profile;
    one_of(&mut errors, "preset", &profile.preset, &PRESETS);
    one_of(&mut errors, "painter", &profile.painter, &["checker", "bands"]);
    if profile.name.as_ref().is_some_and(|n| n.len() > 16) {
        errors.push("name must be at most 16 bytes".to_string());
    }
    for (key, value) in [("width", profile.width), ("height", profile.height)] {
        if value.is_some_and(|v| v == 0 || v > u32::from(u16::MAX)) {
            errors.push(format!("{} must be 1-65535", key));
        }
    }
    if profile.tick_ms == Some(0) {
        errors.push("tick_ms must be at least 1".to_string());
    }
    if profile.band_width == Some(0) {
        errors.push("band_width must be at least 1".to_string());
    }

    let palette = &file.palette;
    one_of(&mut errors, "format", &palette.format, &["rgb888", "rgba8888"]);
    if let Some(colors) = &palette.colors {
        if colors.is_empty() || colors.len() > MAX_COLORS {
            errors.push(format!("colors must have 1-{} entries", MAX_COLORS));
        }
        let rgba = palette.format.as_deref() == Some("rgba8888");
        if !rgba && colors.iter().any(|&c| c > 0xff_ffff) {
            errors.push("rgb888 colors must be at most 0xffffff".to_string());
        }
    }

    let rotation = &file.rotation;
    if let (Some(start), Some(end)) = (rotation.zone_start, rotation.zone_end) {
        if start >= end {
            errors.push("zone_start must be below zone_end".to_string());
        } else if rotation.modulus.is_some_and(|k| k > end - start) {
            errors.push("modulus must not exceed the zone length".to_string());
        }
    }
    if rotation.zone_end.is_some_and(|end| end as usize > MAX_COLORS) {
        errors.push(format!("zone_end must be at most {}", MAX_COLORS));
    }
    if rotation.modulus == Some(0) {
        errors.push("modulus must be at least 1".to_string());
    }

    let stream = &file.stream;
    for (key, value) in [
        ("frame_stride", stream.frame_stride),
        ("palette_stride", stream.palette_stride),
    ] {
        if value.is_some_and(|v| v == 0 || v > MAX_STRIDE) {
            errors.push(format!("{} must be 1-{}", key, MAX_STRIDE));
        }
    }
    one_of(&mut errors, "on_click", &stream.on_click, &["frame", "frame_and_palette"]);
    one_of(&mut errors, "on_rotate", &stream.on_rotate, &["palette", "palette_and_frame"]);

    errors
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

