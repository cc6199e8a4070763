//! CLI color functions.
//!
//! All functions respect `NO_COLOR`, `FORCE_COLOR`, and TTY detection via
//! `owo-colors`' `if_supports_color()`. The `--no-color` flag sets an internal
//! flag that bypasses owo-colors entirely.

use std::sync::atomic::{AtomicBool, Ordering};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

/// Global override: when true, forces color off (set by `--no-color` flag).
static NO_COLOR_FLAG: AtomicBool = AtomicBool::new(false);

/// Call once from main.rs when `--no-color` is passed.
pub fn set_no_color() {
    NO_COLOR_FLAG.store(true, Ordering::Relaxed);
}

// Palette: hex codes are the single source of truth.

#[derive(Debug, Clone, Copy)]
struct Rgb {
    r: u8,
    g: u8,
    b: u8,
}

impl Rgb {
    const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as u8,
            g: ((hex >> 8) & 0xFF) as u8,
            b: (hex & 0xFF) as u8,
        }
    }
}

const ICE: Rgb = Rgb::from_hex(0x7CB4C8); // Project names
const AURORA: Rgb = Rgb::from_hex(0x6B8F5E); // Ready
const COPPER: Rgb = Rgb::from_hex(0xC49A5C); // Queued/building
const EMBER: Rgb = Rgb::from_hex(0xB87060); // Error
const KIRI: Rgb = Rgb::from_hex(0xA088B0); // Production target
const MUTED: Rgb = Rgb::from_hex(0x5C6370); // Secondary info

fn no_color() -> bool {
    NO_COLOR_FLAG.load(Ordering::Relaxed)
}

fn paint(text: &str, rgb: Rgb) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(Stdout, |t| t.truecolor(rgb.r, rgb.g, rgb.b))
        .to_string()
}

fn paint_stderr(text: &str, rgb: Rgb) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(owo_colors::Stream::Stderr, |t| {
        t.truecolor(rgb.r, rgb.g, rgb.b)
    })
    .to_string()
}

pub fn ice(text: &str) -> String {
    paint(text, ICE)
}

pub fn aurora(text: &str) -> String {
    paint(text, AURORA)
}

pub fn copper(text: &str) -> String {
    paint(text, COPPER)
}

pub fn ember(text: &str) -> String {
    paint(text, EMBER)
}

pub fn kiri(text: &str) -> String {
    paint(text, KIRI)
}

pub fn muted(text: &str) -> String {
    paint(text, MUTED)
}

/// Bold text (headers).
pub fn bold(text: &str) -> String {
    if no_color() {
        return text.to_string();
    }
    text.if_supports_color(Stdout, |t| t.bold()).to_string()
}

/// Color-code a deployment state. Matches on the trimmed value so padded
/// cells keep their width.
pub fn state(state_str: &str) -> String {
    match state_str.trim() {
        "ready" => aurora(state_str),
        "queued" | "building" => copper(state_str),
        "error" => ember(state_str),
        "canceled" | "unknown" => muted(state_str),
        _ => state_str.to_string(),
    }
}

/// Color-code a target environment label.
pub fn target(target_str: &str) -> String {
    match target_str.trim() {
        "production" => kiri(target_str),
        "-" => muted(target_str),
        _ => target_str.to_string(),
    }
}

/// Error styling for stderr messages.
pub fn error(text: &str) -> String {
    paint_stderr(text, EMBER)
}

/// Warning styling for stderr messages.
pub fn warning(text: &str) -> String {
    paint_stderr(text, COPPER)
}

/// Hint styling for secondary info on stderr.
pub fn hint(text: &str) -> String {
    paint_stderr(text, MUTED)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rgb_from_hex() {
        let c = Rgb::from_hex(0x7CB4C8);
        assert_eq!(c.r, 124);
        assert_eq!(c.g, 180);
        assert_eq!(c.b, 200);
    }

    #[test]
    fn test_no_color_flag_disables_all_formatting() {
        NO_COLOR_FLAG.store(true, Ordering::Relaxed);

        assert_eq!(ice("test"), "test");
        assert_eq!(aurora("test"), "test");
        assert_eq!(copper("test"), "test");
        assert_eq!(ember("test"), "test");
        assert_eq!(kiri("test"), "test");
        assert_eq!(bold("test"), "test");
        assert_eq!(muted("test"), "test");
        assert_eq!(error("test"), "test");
        assert_eq!(warning("test"), "test");
        assert_eq!(hint("test"), "test");
        assert_eq!(state("building "), "building ");
        assert_eq!(target("production"), "production");

        NO_COLOR_FLAG.store(false, Ordering::Relaxed);
    }

    #[test]
    fn test_unknown_values_pass_through() {
        assert_eq!(state("mystery"), "mystery");
        assert_eq!(target("staging"), "staging");
    }
}
