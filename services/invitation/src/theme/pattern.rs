//! Repeating background patterns rendered as SVG data URIs

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternKind {
    None,
    Dots,
    Grid,
    Diagonal,
    Floral,
    Hearts,
    Waves,
    Diamonds,
}

/// Side of the square SVG tile, in pixels
const TILE: u32 = 40;

fn tile_body(pattern: PatternKind, color: &str) -> Option<String> {
    let body = match pattern {
        PatternKind::None => return None,
        PatternKind::Dots => format!(r#"<circle cx="20" cy="20" r="2" fill="{color}"/>"#),
        PatternKind::Grid => {
            format!(r#"<path d="M40 0H0V40" fill="none" stroke="{color}" stroke-width="1"/>"#)
        }
        PatternKind::Diagonal => format!(
            r#"<path d="M-10 10L10 -10M0 40L40 0M30 50L50 30" stroke="{color}" stroke-width="1"/>"#
        ),
        PatternKind::Floral => format!(
            r#"<g fill="{color}"><circle cx="20" cy="14" r="4"/><circle cx="26" cy="20" r="4"/><circle cx="20" cy="26" r="4"/><circle cx="14" cy="20" r="4"/></g>"#
        ),
        PatternKind::Hearts => format!(
            r#"<path d="M20 28C12 22 12 14 17 14C19 14 20 16 20 16C20 16 21 14 23 14C28 14 28 22 20 28Z" fill="{color}"/>"#
        ),
        PatternKind::Waves => format!(
            r#"<path d="M0 20Q10 10 20 20T40 20" fill="none" stroke="{color}" stroke-width="1.5"/>"#
        ),
        PatternKind::Diamonds => {
            format!(r#"<path d="M20 8L32 20L20 32L8 20Z" fill="none" stroke="{color}" stroke-width="1"/>"#)
        }
    };
    Some(body)
}

/// SVG tile for `pattern` drawn in `color`, or `None` for [`PatternKind::None`]
pub fn pattern_svg(pattern: PatternKind, color: &str) -> Option<String> {
    let color = color.replace(['"', '<', '>'], "");
    let body = tile_body(pattern, &color)?;
    Some(format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{TILE}" height="{TILE}" viewBox="0 0 {TILE} {TILE}" opacity="0.15">{body}</svg>"#
    ))
}

/// `data:` URI suitable for a CSS `background-image: url(...)`
pub fn pattern_data_uri(pattern: PatternKind, color: &str) -> Option<String> {
    pattern_svg(pattern, color)
        .map(|svg| format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg)))
}
