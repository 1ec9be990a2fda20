//! Programmatic tray glyphs.
//!
//! The two icon states are drawn at runtime instead of being shipped as
//! image assets: a filled green disc while the device is enabled, and a grey
//! disc with a red diagonal stroke while it is disabled.  Pixels are plain
//! RGBA bytes so this module stays platform-independent; the tray module
//! hands them to the toolkit's icon constructor.

use touchtray_core::DisplayState;

/// Edge length of the generated square glyph in pixels.
pub const GLYPH_SIZE: u32 = 32;

const ENABLED_FILL: [u8; 3] = [56, 142, 60];
const DISABLED_FILL: [u8; 3] = [117, 117, 117];
const STROKE: [u8; 3] = [211, 47, 47];

/// Renders the glyph for `state` as tightly packed RGBA rows.
///
/// The returned buffer is always `GLYPH_SIZE * GLYPH_SIZE * 4` bytes.
pub fn glyph_rgba(state: DisplayState) -> Vec<u8> {
    let size = GLYPH_SIZE as i32;
    let center = (size - 1) as f32 / 2.0;
    let radius = center - 1.0;
    let fill = if state.is_enabled() {
        ENABLED_FILL
    } else {
        DISABLED_FILL
    };

    let mut rgba = Vec::with_capacity((GLYPH_SIZE * GLYPH_SIZE * 4) as usize);
    for y in 0..size {
        for x in 0..size {
            let dx = x as f32 - center;
            let dy = y as f32 - center;
            let inside = dx * dx + dy * dy <= radius * radius;

            // Anti-diagonal stroke from bottom-left to top-right, only drawn
            // in the disabled state and only inside the disc.
            let on_stroke =
                !state.is_enabled() && inside && (x + y - (size - 1)).abs() <= 2;

            let (color, alpha) = if !inside {
                ([0, 0, 0], 0)
            } else if on_stroke {
                (STROKE, 255)
            } else {
                (fill, 255)
            };
            rgba.extend_from_slice(&[color[0], color[1], color[2], alpha]);
        }
    }
    rgba
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn pixel(rgba: &[u8], x: u32, y: u32) -> [u8; 4] {
        let offset = ((y * GLYPH_SIZE + x) * 4) as usize;
        [
            rgba[offset],
            rgba[offset + 1],
            rgba[offset + 2],
            rgba[offset + 3],
        ]
    }

    #[test]
    fn test_glyph_has_exact_rgba_buffer_size() {
        for state in [DisplayState::Enabled, DisplayState::Disabled] {
            let rgba = glyph_rgba(state);
            assert_eq!(rgba.len(), (GLYPH_SIZE * GLYPH_SIZE * 4) as usize);
        }
    }

    #[test]
    fn test_glyph_corners_are_transparent() {
        let rgba = glyph_rgba(DisplayState::Enabled);
        let last = GLYPH_SIZE - 1;
        for (x, y) in [(0, 0), (last, 0), (0, last), (last, last)] {
            assert_eq!(pixel(&rgba, x, y)[3], 0, "corner ({x},{y}) must be transparent");
        }
    }

    #[test]
    fn test_enabled_and_disabled_glyphs_differ_at_the_center() {
        // The stroke crosses the center, so the two states must render
        // visibly different pixels there.
        let enabled = glyph_rgba(DisplayState::Enabled);
        let disabled = glyph_rgba(DisplayState::Disabled);
        let mid = GLYPH_SIZE / 2;
        assert_ne!(pixel(&enabled, mid, mid), pixel(&disabled, mid, mid));
    }

    #[test]
    fn test_disabled_glyph_carries_the_red_stroke() {
        let rgba = glyph_rgba(DisplayState::Disabled);
        let mid = GLYPH_SIZE / 2;
        // Sample along the anti-diagonal near the center.
        let p = pixel(&rgba, mid, GLYPH_SIZE - 1 - mid);
        assert_eq!(&p[..3], &STROKE);
        assert_eq!(p[3], 255);
    }
}
