//! `profile.toml` parser
//!
//! A minimal TOML subset, enough for deployment profiles. It does NOT
//! support the full TOML spec.
//!
//! Supported:
//! - `[profile]`, `[palette]`, `[rotation]` and `[stream]` sections
//! - `key = value` with strings, booleans and integers (decimal or `0x` hex)
//! - Integer arrays, which may span several lines
//! - Comments (`# ...`)
//!
//! Parsing starts from the preset named by `preset` in `[profile]`
//! (`checker16` when absent), wherever in the file that key appears. Every
//! other key overrides one field. The result is validated before it is
//! returned.

use heapless::Vec;

use super::profile::{ClickPolicy, DeploymentProfile, PainterKind, RotatePolicy};
use super::ConfigError;
use crate::palette::{Color, ColorFormat, MAX_COLORS};

/// Parse failure with its 1-based line number
///
/// `line` is 0 for problems found only after the whole file is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseError {
    pub line: usize,
    pub kind: ParseErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseErrorKind {
    /// Line is neither a header nor `key = value`
    Syntax,
    /// Section header not recognized
    UnknownSection,
    /// Key not valid in its section
    UnknownKey,
    /// Value has the wrong type or is out of range
    InvalidValue,
    /// `preset` names no built-in preset
    UnknownPreset,
    /// More colors than the palette can hold
    TooManyColors,
    /// Array opened with `[` but never closed
    UnterminatedArray,
    /// Parsed profile failed validation
    Invalid(ConfigError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Root,
    Profile,
    Palette,
    Rotation,
    Stream,
}

type RawColors = Vec<u32, MAX_COLORS>;

/// Parse a profile from TOML text
pub fn parse_profile(input: &str) -> Result<DeploymentProfile, ParseError> {
    let mut profile = match find_preset(input)? {
        Some((line, name)) => DeploymentProfile::preset(name).ok_or(ParseError {
            line,
            kind: ParseErrorKind::UnknownPreset,
        })?,
        None => DeploymentProfile::checker16(),
    };

    let mut section = Section::Root;
    let mut colors: Option<(usize, RawColors)> = None;
    let mut format: Option<ColorFormat> = None;
    let mut lines = input.lines().enumerate().map(|(i, l)| (i + 1, l));

    while let Some((line_no, raw)) = lines.next() {
        let line = strip_comment(raw).trim();
        if line.is_empty() {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1]).ok_or(ParseError {
                line: line_no,
                kind: ParseErrorKind::UnknownSection,
            })?;
            continue;
        }

        let (key, value) = parse_key_value(line).ok_or(ParseError {
            line: line_no,
            kind: ParseErrorKind::Syntax,
        })?;
        let fail = |kind| ParseError {
            line: line_no,
            kind,
        };

        match (section, key) {
            (Section::Palette, "colors") => {
                let array = parse_array(value, line_no, &mut lines)?;
                colors = Some((line_no, array));
            }
            (Section::Palette, "format") => {
                format = Some(parse_color_format(value).map_err(fail)?);
            }
            _ => apply_value(section, key, value, &mut profile).map_err(fail)?,
        }
    }

    if let Some(format) = format {
        profile.stream.color_format = format;
    }
    if let Some((line, raw)) = colors {
        profile.colors.clear();
        for hex in raw {
            let color = to_color(hex, profile.stream.color_format).ok_or(ParseError {
                line,
                kind: ParseErrorKind::InvalidValue,
            })?;
            // Same capacity as RawColors
            let _ = profile.colors.push(color);
        }
    }

    profile.validate().map_err(|e| ParseError {
        line: 0,
        kind: ParseErrorKind::Invalid(e),
    })?;
    Ok(profile)
}

/// Find `preset = "..."` in `[profile]`
fn find_preset(input: &str) -> Result<Option<(usize, &str)>, ParseError> {
    let mut section = Section::Root;
    for (i, raw) in input.lines().enumerate() {
        let line = strip_comment(raw).trim();
        if line.starts_with('[') && line.ends_with(']') {
            section = parse_section_header(&line[1..line.len() - 1]).unwrap_or(Section::Root);
            continue;
        }
        if section != Section::Profile {
            continue;
        }
        if let Some(("preset", value)) = parse_key_value(line) {
            let name = parse_string(value).map_err(|kind| ParseError { line: i + 1, kind })?;
            return Ok(Some((i + 1, name)));
        }
    }
    Ok(None)
}

fn parse_section_header(header: &str) -> Option<Section> {
    match header.trim() {
        "profile" => Some(Section::Profile),
        "palette" => Some(Section::Palette),
        "rotation" => Some(Section::Rotation),
        "stream" => Some(Section::Stream),
        _ => None,
    }
}

/// Drop a trailing comment, ignoring `#` inside strings
fn strip_comment(line: &str) -> &str {
    let mut in_string = false;
    for (i, c) in line.char_indices() {
        match c {
            '"' => in_string = !in_string,
            '#' if !in_string => return &line[..i],
            _ => {}
        }
    }
    line
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    let value = value.trim();
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseErrorKind> {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .ok_or(ParseErrorKind::InvalidValue)
}

/// Parse a decimal or `0x` hex integer
fn parse_int<T: TryFrom<u32>>(value: &str) -> Result<T, ParseErrorKind> {
    let raw = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse(),
    };
    raw.ok()
        .and_then(|v| T::try_from(v).ok())
        .ok_or(ParseErrorKind::InvalidValue)
}

fn parse_bool(value: &str) -> Result<bool, ParseErrorKind> {
    match value {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

fn parse_color_format(value: &str) -> Result<ColorFormat, ParseErrorKind> {
    match parse_string(value)? {
        "rgb888" => Ok(ColorFormat::Rgb888),
        "rgba8888" => Ok(ColorFormat::Rgba8888),
        _ => Err(ParseErrorKind::InvalidValue),
    }
}

/// Parse an integer array, pulling more lines until the closing `]`
fn parse_array<'a, I>(first: &'a str, line_no: usize, rest: &mut I) -> Result<RawColors, ParseError>
where
    I: Iterator<Item = (usize, &'a str)>,
{
    let body = first.strip_prefix('[').ok_or(ParseError {
        line: line_no,
        kind: ParseErrorKind::InvalidValue,
    })?;

    let mut out = RawColors::new();
    let mut current = (line_no, body);
    loop {
        let (n, text) = current;
        let (items, closed) = match text.split_once(']') {
            Some((items, tail)) if tail.trim().is_empty() => (items, true),
            Some(_) => {
                return Err(ParseError {
                    line: n,
                    kind: ParseErrorKind::Syntax,
                })
            }
            None => (text, false),
        };

        for item in items.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            let value = parse_int(item).map_err(|kind| ParseError { line: n, kind })?;
            out.push(value).map_err(|_| ParseError {
                line: n,
                kind: ParseErrorKind::TooManyColors,
            })?;
        }

        if closed {
            return Ok(out);
        }
        current = match rest.next() {
            Some((n, raw)) => (n, strip_comment(raw).trim()),
            None => {
                return Err(ParseError {
                    line: line_no,
                    kind: ParseErrorKind::UnterminatedArray,
                })
            }
        };
    }
}

fn to_color(hex: u32, format: ColorFormat) -> Option<Color> {
    match format {
        ColorFormat::Rgb888 if hex <= 0xff_ffff => Some(Color::rgb(hex)),
        ColorFormat::Rgb888 => None,
        ColorFormat::Rgba8888 => Some(Color::rgba(hex)),
    }
}

fn apply_value(
    section: Section,
    key: &str,
    value: &str,
    profile: &mut DeploymentProfile,
) -> Result<(), ParseErrorKind> {
    match (section, key) {
        // Handled before the main pass
        (Section::Profile, "preset") => {}
        (Section::Profile, "name") => {
            profile.name.clear();
            profile
                .name
                .push_str(parse_string(value)?)
                .map_err(|_| ParseErrorKind::InvalidValue)?;
        }
        (Section::Profile, "width") => profile.width = parse_int(value)?,
        (Section::Profile, "height") => profile.height = parse_int(value)?,
        (Section::Profile, "tick_ms") => profile.tick_ms = parse_int(value)?,
        (Section::Profile, "painter") => {
            profile.painter = match parse_string(value)? {
                "checker" => PainterKind::Checker,
                "bands" => PainterKind::Bands,
                _ => return Err(ParseErrorKind::InvalidValue),
            }
        }
        (Section::Profile, "band_width") => profile.band_width = parse_int(value)?,

        (Section::Rotation, "zone_start") => profile.zone_start = parse_int(value)?,
        (Section::Rotation, "zone_end") => profile.zone_end = parse_int(value)?,
        (Section::Rotation, "modulus") => profile.modulus = parse_int(value)?,

        (Section::Stream, "frame_stride") => profile.stream.frame_stride = parse_int(value)?,
        (Section::Stream, "palette_stride") => profile.stream.palette_stride = parse_int(value)?,
        (Section::Stream, "separator") => profile.stream.separator = parse_bool(value)?,
        (Section::Stream, "on_click") => {
            profile.stream.click = match parse_string(value)? {
                "frame" => ClickPolicy::FrameOnly,
                "frame_and_palette" => ClickPolicy::FrameAndPalette,
                _ => return Err(ParseErrorKind::InvalidValue),
            }
        }
        (Section::Stream, "on_rotate") => {
            profile.stream.rotate = match parse_string(value)? {
                "palette" => RotatePolicy::PaletteOnly,
                "palette_and_frame" => RotatePolicy::PaletteAndFrame,
                _ => return Err(ParseErrorKind::InvalidValue),
            }
        }

        _ => return Err(ParseErrorKind::UnknownKey),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_checker16() {
        assert_eq!(parse_profile(""), Ok(DeploymentProfile::checker16()));
        assert_eq!(
            parse_profile("# nothing here\n\n"),
            Ok(DeploymentProfile::checker16())
        );
    }

    #[test]
    fn test_preset_then_overrides() {
        let input = r#"
[stream]
frame_stride = 48   # override
on_rotate = "palette"

[profile]
preset = "bands32"
name = "desk #2"
"#;
        let profile = parse_profile(input).unwrap();
        assert_eq!(profile.name.as_str(), "desk #2");
        assert_eq!(profile.colors.len(), 32);
        assert_eq!(profile.stream.frame_stride, 48);
        assert_eq!(profile.stream.palette_stride, 96);
        assert_eq!(profile.stream.rotate, RotatePolicy::PaletteOnly);
    }

    #[test]
    fn test_multiline_colors() {
        let input = "
[profile]
preset = \"bands6\"
band_width = 4

[palette]
colors = [
    0xff0000, 0x00ff00,  # red, green
    0x0000ff,
    255,
]

[rotation]
zone_start = 1
zone_end = 4
modulus = 3
";
        let profile = parse_profile(input).unwrap();
        let hex: std::vec::Vec<u32> = profile.colors.iter().map(|c| c.to_rgb()).collect();
        assert_eq!(hex, [0xff0000, 0x00ff00, 0x0000ff, 0x0000ff]);
        assert_eq!(profile.zone(), 1..4);
        assert_eq!(profile.band_width, 4);
    }

    #[test]
    fn test_rgba_colors() {
        let input = "[profile]\npreset = \"bands6\"\n[palette]\ncolors = [0x11223344]\nformat = \"rgba8888\"\n[rotation]\nzone_end = 1\nmodulus = 1\n";
        let profile = parse_profile(input).unwrap();
        assert_eq!(profile.colors[0], Color::rgba(0x11223344));
        assert_eq!(profile.stream.color_format, ColorFormat::Rgba8888);
    }

    #[test]
    fn test_error_lines() {
        assert_eq!(
            parse_profile("[profile]\nwidth = -3\n"),
            Err(ParseError {
                line: 2,
                kind: ParseErrorKind::InvalidValue
            })
        );
        assert_eq!(
            parse_profile("\n[display]\n").unwrap_err().kind,
            ParseErrorKind::UnknownSection
        );
        assert_eq!(
            parse_profile("[stream]\nbaud = 9600\n").unwrap_err().kind,
            ParseErrorKind::UnknownKey
        );
        assert_eq!(
            parse_profile("[profile]\npreset = \"boing\"\n"),
            Err(ParseError {
                line: 2,
                kind: ParseErrorKind::UnknownPreset
            })
        );
        assert_eq!(
            parse_profile("[palette]\ncolors = [1, 2,\n3\n").unwrap_err(),
            ParseError {
                line: 2,
                kind: ParseErrorKind::UnterminatedArray
            }
        );
        assert_eq!(
            parse_profile("[palette]\ncolors = [0x1000000]\n").unwrap_err(),
            ParseError {
                line: 2,
                kind: ParseErrorKind::InvalidValue
            }
        );
        assert_eq!(
            parse_profile("just words\n").unwrap_err().kind,
            ParseErrorKind::Syntax
        );
    }

    #[test]
    fn test_too_many_colors() {
        let mut input = std::string::String::from("[palette]\ncolors = [\n");
        for _ in 0..=MAX_COLORS {
            input.push_str("0x010101,\n");
        }
        input.push_str("]\n");
        assert_eq!(
            parse_profile(&input).unwrap_err().kind,
            ParseErrorKind::TooManyColors
        );
    }

    #[test]
    fn test_validation_runs_last() {
        let input = "[rotation]\nmodulus = 12\n";
        assert_eq!(
            parse_profile(input),
            Err(ParseError {
                line: 0,
                kind: ParseErrorKind::Invalid(ConfigError::Modulus)
            })
        );
    }
}
