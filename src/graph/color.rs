use eframe::egui::Color32;

/// Parses a node color override.
///
/// Accepts `#RGB`, `#RRGGBB`, `#RRGGBBAA`, `rgb(r, g, b)` and
/// `rgba(r, g, b[, a])` with `a` in `0.0..=1.0`. Anything else is `None` so the
/// caller can fall back to a derived color.
pub fn parse_color(value: &str) -> Option<Color32> {
    let value = value.trim();
    if let Some(hex) = value.strip_prefix('#') {
        return parse_hex(hex);
    }

    let lower = value.to_ascii_lowercase();
    let body = lower
        .strip_prefix("rgba(")
        .or_else(|| lower.strip_prefix("rgb("))?
        .strip_suffix(')')?;
    parse_rgb_components(body)
}

fn parse_hex(hex: &str) -> Option<Color32> {
    if !hex.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return None;
    }

    let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
    let short = |index: usize| channel(index..index + 1).map(|value| value * 17);

    match hex.len() {
        3 => Some(Color32::from_rgb(short(0)?, short(1)?, short(2)?)),
        6 => Some(Color32::from_rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?)),
        8 => Some(Color32::from_rgba_unmultiplied(
            channel(0..2)?,
            channel(2..4)?,
            channel(4..6)?,
            channel(6..8)?,
        )),
        _ => None,
    }
}

fn parse_rgb_components(body: &str) -> Option<Color32> {
    let parts = body.split(',').map(str::trim).collect::<Vec<_>>();
    if !(3..=4).contains(&parts.len()) {
        return None;
    }

    let mut rgb = [0u8; 3];
    for (slot, part) in rgb.iter_mut().zip(&parts) {
        let value = part.parse::<f32>().ok().filter(|value| value.is_finite())?;
        *slot = value.round().clamp(0.0, 255.0) as u8;
    }

    let alpha = match parts.get(3) {
        Some(part) => {
            let value = part.parse::<f32>().ok().filter(|value| value.is_finite())?;
            (value.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        None => 255,
    };

    Some(Color32::from_rgba_unmultiplied(rgb[0], rgb[1], rgb[2], alpha))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_forms() {
        assert_eq!(parse_color("#f00"), Some(Color32::from_rgb(255, 0, 0)));
        assert_eq!(parse_color("#1a2B3c"), Some(Color32::from_rgb(26, 43, 60)));
        assert_eq!(
            parse_color("#ff000080"),
            Some(Color32::from_rgba_unmultiplied(255, 0, 0, 128))
        );
    }

    #[test]
    fn parses_rgb_functions() {
        assert_eq!(
            parse_color("rgba(10, 20, 30)"),
            Some(Color32::from_rgb(10, 20, 30))
        );
        assert_eq!(
            parse_color("RGB(1,2,3)"),
            Some(Color32::from_rgb(1, 2, 3))
        );
        assert_eq!(
            parse_color("rgba(255, 255, 255, 0)"),
            Some(Color32::from_rgba_unmultiplied(255, 255, 255, 0))
        );
    }

    #[test]
    fn rejects_malformed_values() {
        for value in [
            "", "red", "#12", "#12345", "#ggg", "#ff00ff0", "rgba(1,2)", "rgba(1,2,3,4,5)",
            "rgba(a,b,c)", "rgba(1,2,3", "hsl(1,2,3)",
        ] {
            assert_eq!(parse_color(value), None, "{value}");
        }
    }
}
