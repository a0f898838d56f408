//! Colour text formatting and contrast-marker computation.

/// Which textual colour format is shown in the panel. Toggled by right-click;
/// exactly one mode is active at any time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColourMode {
    #[default]
    Rgb,
    Hex,
}

impl ColourMode {
    pub fn toggled(self) -> Self {
        match self {
            ColourMode::Rgb => ColourMode::Hex,
            ColourMode::Hex => ColourMode::Rgb,
        }
    }
}

/// Format a sampled pixel for display.
///
/// Rgb mode shows the raw components. Hex mode inverts each component before
/// encoding (`255 - c`), which disagrees with Rgb mode's raw values - that is
/// the behaviour of the tool this one replaces, kept on purpose. Confirm
/// intent before "fixing" it.
pub fn format_colour(mode: ColourMode, (r, g, b): (u8, u8, u8)) -> String {
    match mode {
        ColourMode::Rgb => format!("({},{},{})", r, g, b),
        ColourMode::Hex => format!("#{:02x}{:02x}{:02x}", 255 - r, 255 - g, 255 - b),
    }
}

/// The string handed to the clipboard at commit: always the RGB textual form
/// with an `rgb` prefix, whatever mode the panel is showing.
pub fn committed_colour(sample: (u8, u8, u8)) -> String {
    format!("rgb{}", format_colour(ColourMode::Rgb, sample))
}

/// Contrast marker grey level: `255 - max(r, g, b)`, so the crosshair stays
/// visible over both bright and dark pixels. Independent of the colour mode.
pub fn marker_grey((r, g, b): (u8, u8, u8)) -> u8 {
    255 - r.max(g).max(b)
}

/// Marker colour packed as 0xAARRGGBB, the grey level replicated into all
/// three channels.
pub fn marker_argb(sample: (u8, u8, u8)) -> u32 {
    let grey = marker_grey(sample) as u32;
    0xFF00_0000 | grey << 16 | grey << 8 | grey
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rgb_mode_shows_raw_components() {
        assert_eq!(format_colour(ColourMode::Rgb, (10, 20, 30)), "(10,20,30)");
        assert_eq!(format_colour(ColourMode::Rgb, (0, 0, 0)), "(0,0,0)");
        assert_eq!(
            format_colour(ColourMode::Rgb, (255, 255, 255)),
            "(255,255,255)"
        );
    }

    #[test]
    fn hex_mode_inverts_each_component() {
        // 255-10 = 245 = 0xf5, 255-20 = 235 = 0xeb, 255-30 = 225 = 0xe1
        assert_eq!(format_colour(ColourMode::Hex, (10, 20, 30)), "#f5ebe1");
        assert_eq!(format_colour(ColourMode::Hex, (255, 255, 255)), "#000000");
        assert_eq!(format_colour(ColourMode::Hex, (0, 0, 0)), "#ffffff");
    }

    #[test]
    fn hex_components_are_zero_padded() {
        assert_eq!(format_colour(ColourMode::Hex, (250, 251, 252)), "#050403");
    }

    #[test]
    fn committed_string_is_rgb_form_with_prefix() {
        assert_eq!(committed_colour((10, 20, 30)), "rgb(10,20,30)");
    }

    #[test]
    fn marker_tracks_brightest_channel_only() {
        assert_eq!(marker_grey((10, 20, 30)), 225);
        assert_eq!(marker_argb((10, 20, 30)), 0xFFE1E1E1);
        // Pure white pixel -> black marker, pure black pixel -> white marker
        assert_eq!(marker_grey((255, 255, 255)), 0);
        assert_eq!(marker_grey((0, 0, 0)), 255);
    }

    #[test]
    fn double_toggle_is_identity() {
        for mode in [ColourMode::Rgb, ColourMode::Hex] {
            assert_ne!(mode.toggled(), mode);
            assert_eq!(mode.toggled().toggled(), mode);
        }
    }
}
