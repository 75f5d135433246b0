use ratatui::style::Color;

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: &'static str,
    pub header_accent_bg: Color,
    pub header_accent_fg: Color,
    pub border: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub status_err: Color,
    pub statusbar_bg: Color,
    pub gauge_unfilled: Color,
    pub sparkline_cpu: Color,
    pub sparkline_memory: Color,
    /// Gauge fill for low, elevated and critical load.
    pub heat_colors: [Color; 3],
}

impl Theme {
    pub fn from_config(theme_name: &str) -> Self {
        match theme_name.to_lowercase().as_str() {
            "light" => Self::light(),
            _ => Self::dark(),
        }
    }

    pub fn heat(&self, percent: f64) -> Color {
        if percent >= 85.0 {
            self.heat_colors[2]
        } else if percent >= 60.0 {
            self.heat_colors[1]
        } else {
            self.heat_colors[0]
        }
    }

    pub fn dark() -> Self {
        Theme {
            name: "dark",
            header_accent_bg: Color::Green,
            header_accent_fg: Color::Black,
            border: Color::DarkGray,
            text_primary: Color::White,
            text_secondary: Color::Gray,
            status_err: Color::Red,
            statusbar_bg: Color::DarkGray,
            gauge_unfilled: Color::DarkGray,
            sparkline_cpu: Color::Rgb(251, 146, 60),
            sparkline_memory: Color::Rgb(103, 232, 249),
            heat_colors: [
                Color::Rgb(16, 185, 129),
                Color::Rgb(249, 115, 22),
                Color::Rgb(239, 68, 68),
            ],
        }
    }

    pub fn light() -> Self {
        Theme {
            name: "light",
            header_accent_bg: Color::Blue,
            header_accent_fg: Color::White,
            border: Color::Gray,
            text_primary: Color::Black,
            text_secondary: Color::DarkGray,
            status_err: Color::Red,
            statusbar_bg: Color::Gray,
            gauge_unfilled: Color::Gray,
            sparkline_cpu: Color::Rgb(194, 65, 12),
            sparkline_memory: Color::Rgb(14, 116, 144),
            heat_colors: [
                Color::Rgb(21, 128, 61),
                Color::Rgb(180, 83, 9),
                Color::Rgb(185, 28, 28),
            ],
        }
    }
}
