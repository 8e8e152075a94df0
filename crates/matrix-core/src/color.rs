// File: crates/matrix-core/src/color.rs
// Summary: Parses the CSS color forms used by the palette (#rgb, #rrggbb, hwb()) into Skia colors.

use skia_safe as skia;

/// Parse `#rgb`, `#rrggbb` or `hwb(h w% b% [/ a])`. Returns `None` for anything else.
pub fn parse_css_color(input: &str) -> Option<skia::Color> {
    let s = input.trim();
    if let Some(hex) = s.strip_prefix('#') {
        return parse_hex(hex);
    }
    let inner = s.strip_prefix("hwb(")?.strip_suffix(')')?;
    parse_hwb(inner)
}

fn parse_hex(hex: &str) -> Option<skia::Color> {
    if !hex.is_ascii() {
        return None;
    }
    let digits = |s: &str| u8::from_str_radix(s, 16).ok();
    match hex.len() {
        3 => {
            let mut c = hex.chars().map(|ch| digits(&format!("{ch}{ch}")));
            Some(skia::Color::from_rgb(c.next()??, c.next()??, c.next()??))
        }
        6 => Some(skia::Color::from_rgb(digits(&hex[0..2])?, digits(&hex[2..4])?, digits(&hex[4..6])?)),
        _ => None,
    }
}

fn parse_hwb(inner: &str) -> Option<skia::Color> {
    let (channels, alpha) = match inner.split_once('/') {
        Some((c, a)) => (c, Some(a.trim())),
        None => (inner, None),
    };
    let mut parts = channels.split_whitespace();
    let hue: f32 = parts.next()?.trim_end_matches("deg").parse().ok()?;
    let white = percent(parts.next()?)?;
    let black = percent(parts.next()?)?;
    let alpha = match alpha {
        Some(a) if a.ends_with('%') => percent(a)?,
        Some(a) => a.parse::<f32>().ok()?,
        None => 1.0,
    };

    // Whiteness and blackness beyond 100% in total collapse to a gray.
    let (w, b) = if white + black > 1.0 {
        let sum = white + black;
        (white / sum, black / sum)
    } else {
        (white, black)
    };
    let (r, g, bl) = hue_to_rgb(hue);
    let scale = 1.0 - w - b;
    let channel = |v: f32| ((v * scale + w) * 255.0).round().clamp(0.0, 255.0) as u8;
    let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
    Some(skia::Color::from_argb(a, channel(r), channel(g), channel(bl)))
}

fn percent(s: &str) -> Option<f32> {
    let v: f32 = s.strip_suffix('%')?.parse().ok()?;
    Some(v / 100.0)
}

// Fully saturated, half-lightness color for a hue in degrees.
fn hue_to_rgb(hue: f32) -> (f32, f32, f32) {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    }
}
