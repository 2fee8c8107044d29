use crossterm::style::{Color, Stylize};

/// Colour band a ratio falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Blue,
    Green,
    Yellow,
    Orange,
    DarkOrange,
    Red,
}

impl Band {
    pub fn rgb(&self) -> (u8, u8, u8) {
        match self {
            Band::Blue => (0x03, 0xbe, 0xfc),
            Band::Green => (0x33, 0xf5, 0x6d),
            Band::Yellow => (0xf5, 0xce, 0x33),
            Band::Orange => (0xf5, 0x8e, 0x33),
            Band::DarkOrange => (0xf5, 0x6a, 0x33),
            Band::Red => (0xf5, 0x33, 0x33),
        }
    }

    pub fn color(&self) -> Color {
        let (r, g, b) = self.rgb();
        Color::Rgb { r, g, b }
    }
}

/// Band for load-like ratios, where a higher value is worse
/// (plan vs capacity, remaining work vs time left, task clock)
pub fn load_band(ratio: f64) -> Band {
    if ratio >= 1.0 {
        Band::Red
    } else if ratio >= 0.9 {
        Band::DarkOrange
    } else if ratio >= 0.8 {
        Band::Orange
    } else if ratio >= 0.7 {
        Band::Yellow
    } else if ratio >= 0.6 {
        Band::Green
    } else {
        Band::Blue
    }
}

/// Band for progress-like ratios, where a higher value is better
/// (worked time, achieved work)
pub fn progress_band(ratio: f64) -> Band {
    if ratio >= 1.0 {
        Band::Blue
    } else if ratio >= 0.9 {
        Band::Green
    } else if ratio >= 0.7 {
        Band::Yellow
    } else if ratio >= 0.6 {
        Band::Orange
    } else if ratio >= 0.5 {
        Band::DarkOrange
    } else {
        Band::Red
    }
}

pub const BAR_WIDTH: usize = 40;

/// Filled cells for `ratio` on a bar of `width` cells (clamped to 0..=width)
pub fn filled_cells(ratio: f64, width: usize) -> usize {
    if !ratio.is_finite() || ratio <= 0.0 {
        return 0;
    }
    ((ratio.min(1.0) * width as f64).round() as usize).min(width)
}

/// Text progress bar followed by the percentage
pub fn render_bar(ratio: f64, band: Band, width: usize) -> String {
    let filled = filled_cells(ratio, width);
    let bar = format!(
        "{}{}",
        "█".repeat(filled).with(band.color()),
        "░".repeat(width - filled).dark_grey()
    );
    format!("{} {:>3.0}%", bar, (ratio.max(0.0) * 100.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_bands() {
        assert_eq!(load_band(0.0), Band::Blue);
        assert_eq!(load_band(0.59), Band::Blue);
        assert_eq!(load_band(0.6), Band::Green);
        assert_eq!(load_band(0.75), Band::Yellow);
        assert_eq!(load_band(0.85), Band::Orange);
        assert_eq!(load_band(0.95), Band::DarkOrange);
        assert_eq!(load_band(1.0), Band::Red);
        assert_eq!(load_band(3.0), Band::Red);
    }

    #[test]
    fn test_progress_bands() {
        assert_eq!(progress_band(0.1), Band::Red);
        assert_eq!(progress_band(0.5), Band::DarkOrange);
        assert_eq!(progress_band(0.65), Band::Orange);
        assert_eq!(progress_band(0.8), Band::Yellow);
        assert_eq!(progress_band(0.9), Band::Green);
        assert_eq!(progress_band(1.2), Band::Blue);
    }

    #[test]
    fn test_filled_cells() {
        assert_eq!(filled_cells(0.0, 40), 0);
        assert_eq!(filled_cells(0.5, 40), 20);
        assert_eq!(filled_cells(2.0, 40), 40);
        assert_eq!(filled_cells(-1.0, 40), 0);
        assert_eq!(filled_cells(f64::NAN, 40), 0);
    }

    #[test]
    fn test_render_bar_shows_percent() {
        let bar = render_bar(0.25, load_band(0.25), 8);
        assert!(bar.ends_with(" 25%"));
        assert_eq!(bar.matches('█').count(), 2);
        assert_eq!(bar.matches('░').count(), 6);
    }
}
