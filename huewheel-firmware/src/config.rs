//! Deployment profile loading
//!
//! The profile is compiled into the firmware from `profile.toml`; edit it
//! and rebuild to change boards or patterns. `build.rs` has already
//! rejected malformed files, so a failure here means a cross-field problem
//! such as a zone that does not fit the preset's palette.

use defmt::*;
use huewheel_core::config::{parse_profile, DeploymentProfile};

/// Embedded deployment profile
const EMBEDDED_PROFILE: &str = include_str!("../profile.toml");

/// Parse and validate the embedded profile
///
/// A bad profile is a configuration fault: the firmware refuses to start.
pub fn load_profile() -> DeploymentProfile {
    let profile = match parse_profile(EMBEDDED_PROFILE) {
        Ok(profile) => profile,
        Err(e) => defmt::panic!("profile.toml line {}: {}", e.line, e.kind),
    };

    info!(
        "Profile '{}': {}x{}, {} colors, zone {}..{} (K={}), tick {}ms",
        profile.name.as_str(),
        profile.width,
        profile.height,
        profile.colors.len(),
        profile.zone_start,
        profile.zone_end,
        profile.modulus,
        profile.tick_ms
    );
    info!(
        "Stream: frame stride {}, palette stride {}, {}, click {}, rotate {}",
        profile.stream.frame_stride,
        profile.stream.palette_stride,
        profile.stream.color_format,
        profile.stream.click,
        profile.stream.rotate
    );

    profile
}
