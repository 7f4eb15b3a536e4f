// rundown/src/color_utils.rs

// Deterministic colors for category tags.
// No dependency on ratatui so it can be used from core logic and tests.

/// Stable 32-bit string hash (`h = c + (h << 5) - h`), independent of the std hasher seed.
fn string_hash(s: &str) -> i32 {
    s.chars().fold(0i32, |h, c| {
        (c as i32).wrapping_add(h.wrapping_shl(5).wrapping_sub(h))
    })
}

/// Generates a color tuple (r, g, b) in [0.0, 1.0] for a category name.
/// The same name always yields the same color.
pub fn generate_color(tag: &str) -> (f32, f32, f32) {
    let hash = string_hash(tag);
    let h = hash.rem_euclid(360) as f32;

    let hash_s = (hash >> 8).unsigned_abs();
    let hash_l = (hash >> 16).unsigned_abs();

    // Saturation: 40% - 90% (0.40 .. 0.90)
    let s = 0.40 + ((hash_s % 51) as f32 / 100.0);

    // Lightness: 55% - 80% (0.55 .. 0.80)
    let l = 0.55 + ((hash_l % 26) as f32 / 100.0);

    hsl_to_rgb(h, s, l)
}

/// Same as [`generate_color`] scaled to 0..=255 channels.
pub fn generate_color_u8(tag: &str) -> (u8, u8, u8) {
    let (r, g, b) = generate_color(tag);
    let to_u8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}

/// Helper: HSL to RGB conversion
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = if (0.0..60.0).contains(&h) {
        (c, x, 0.0)
    } else if (60.0..120.0).contains(&h) {
        (x, c, 0.0)
    } else if (120.0..180.0).contains(&h) {
        (0.0, c, x)
    } else if (180.0..240.0).contains(&h) {
        (0.0, x, c)
    } else if (240.0..300.0).contains(&h) {
        (x, 0.0, c)
    } else {
        (c, 0.0, x)
    };

    (r1 + m, g1 + m, b1 + m)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colors_are_deterministic_and_in_range() {
        for tag in ["music", "news", "ad break", ""] {
            let (r, g, b) = generate_color(tag);
            assert_eq!((r, g, b), generate_color(tag));
            for c in [r, g, b] {
                assert!((0.0..=1.0).contains(&c), "{} out of range for {:?}", c, tag);
            }
        }
    }

    #[test]
    fn test_grey_hsl_is_neutral() {
        let (r, g, b) = hsl_to_rgb(0.0, 0.0, 0.5);
        assert!((r - 0.5).abs() < 1e-6 && (g - 0.5).abs() < 1e-6 && (b - 0.5).abs() < 1e-6);
    }
}
