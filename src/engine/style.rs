const HOVER_FALLBACK_RGB: (u8, u8, u8) = (31, 119, 180);
const HOVER_ALPHA: f64 = 0.9;

pub(super) fn edge_width(weight: f64, scale: f64, max: f64) -> f64 {
    (weight * scale).min(max)
}

fn parse_hex(color: &str) -> Option<(u8, u8, u8)> {
    let hex = color.strip_prefix('#')?;
    let channel = |range: std::ops::Range<usize>| {
        hex.get(range)
            .and_then(|digits| u8::from_str_radix(digits, 16).ok())
    };
    Some((channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

fn parse_rgba(color: &str) -> Option<(u8, u8, u8)> {
    let inner = color
        .strip_prefix("rgba(")
        .or_else(|| color.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let mut channels = inner
        .split(',')
        .map(|part| part.trim().parse::<f64>().ok().map(|v| v.clamp(0.0, 255.0) as u8));
    Some((channels.next()??, channels.next()??, channels.next()??))
}

fn rgb_of(color: &str) -> Option<(u8, u8, u8)> {
    parse_hex(color).or_else(|| parse_rgba(color))
}

/// Translucent hover background derived from a hex color.
pub(super) fn hover_background(color: &str) -> String {
    let (r, g, b) = parse_hex(color).unwrap_or(HOVER_FALLBACK_RGB);
    format!("rgba({r}, {g}, {b}, {HOVER_ALPHA})")
}

/// Colors that cannot be parsed count as light.
pub(super) fn is_light_color(color: &str) -> bool {
    let Some((r, g, b)) = rgb_of(color) else {
        return true;
    };

    let luminance = (0.299 * f64::from(r) + 0.587 * f64::from(g) + 0.114 * f64::from(b)) / 255.0;
    luminance > 0.5
}

pub(super) fn contrasting_text_color(background: &str) -> &'static str {
    if is_light_color(background) {
        "#000000"
    } else {
        "#ffffff"
    }
}
