//! Border-shorthand normalization for spacer synthesis.
//!
//! Legacy renderers draw borders as fixed-height colored images, so a
//! declaration like `1px solid #000000` reduces to a pixel height and a
//! six-digit color; the line style keyword carries no information here.

use crate::css::strip_important;

/// Height and color of one synthesized spacer image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpacerSpec {
    pub height_px: u32,
    pub color_hex: String,
}

const LINE_STYLE_KEYWORDS: [&str; 10] = [
    "none", "hidden", "solid", "dotted", "dashed", "double", "groove", "ridge", "inset", "outset",
];

/// Reduce a border shorthand value to a `SpacerSpec`.
///
/// Tolerates token reordering, a trailing `!important`, and missing pieces:
/// no width token means 1px, no color token means black. An unrecognized
/// color token is passed through literally rather than rejected; whatever
/// serves `/galakei/spacer/` decides what to do with it.
pub fn parse_border_shorthand(value: &str) -> SpacerSpec {
    let (value, _) = strip_important(value);
    let mut height_px = None;
    let mut color_hex = None;

    for token in value.split_ascii_whitespace() {
        if height_px.is_none() {
            if let Some(px) = leading_integer(token) {
                height_px = Some(px);
                continue;
            }
        }
        if let Some(hex) = token.strip_prefix('#') {
            if color_hex.is_none() {
                color_hex = Some(expand_hex(hex));
            }
            continue;
        }
        let lower = token.to_ascii_lowercase();
        if LINE_STYLE_KEYWORDS.contains(&lower.as_str()) {
            continue;
        }
        if color_hex.is_none() {
            color_hex = Some(named_color(&lower).map(str::to_string).unwrap_or(lower));
        }
    }

    SpacerSpec {
        height_px: height_px.unwrap_or(1),
        color_hex: color_hex.unwrap_or_else(|| "000000".to_string()),
    }
}

fn leading_integer(token: &str) -> Option<u32> {
    let digits: String = token.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse().ok()
}

fn expand_hex(hex: &str) -> String {
    if hex.len() == 3 && hex.chars().all(|c| c.is_ascii_hexdigit()) {
        let mut out = String::with_capacity(6);
        for c in hex.chars() {
            let c = c.to_ascii_lowercase();
            out.push(c);
            out.push(c);
        }
        return out;
    }
    hex.to_ascii_lowercase()
}

/// The sixteen HTML named colors; `black` is the one the original renderer
/// contract guarantees.
fn named_color(name: &str) -> Option<&'static str> {
    match name {
        "black" => Some("000000"),
        "silver" => Some("c0c0c0"),
        "gray" | "grey" => Some("808080"),
        "white" => Some("ffffff"),
        "maroon" => Some("800000"),
        "red" => Some("ff0000"),
        "purple" => Some("800080"),
        "fuchsia" => Some("ff00ff"),
        "green" => Some("008000"),
        "lime" => Some("00ff00"),
        "olive" => Some("808000"),
        "yellow" => Some("ffff00"),
        "navy" => Some("000080"),
        "blue" => Some("0000ff"),
        "teal" => Some("008080"),
        "aqua" => Some("00ffff"),
        _ => None,
    }
}
