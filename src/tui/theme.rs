use ratatui::style::Color;

use crate::model::UiConfig;

/// Priorities with a color of their own; later letters use `text`
const COLORED_PRIORITIES: [char; 6] = ['A', 'B', 'C', 'D', 'E', 'F'];

/// Parsed color theme for the TUI
#[derive(Debug, Clone)]
pub struct Theme {
    pub background: Color,
    pub text: Color,
    pub text_bright: Color,
    pub highlight: Color,
    pub dim: Color,
    pub red: Color,
    pub yellow: Color,
    pub green: Color,
    pub cyan: Color,
    pub selection_bg: Color,
    /// Priorities A through F
    pub priority: [Color; 6],
}

impl Default for Theme {
    fn default() -> Self {
        let red = Color::Rgb(0xFF, 0x44, 0x44);
        let yellow = Color::Rgb(0xFF, 0xD7, 0x00);
        let green = Color::Rgb(0x44, 0xFF, 0x88);
        let cyan = Color::Rgb(0x44, 0xDD, 0xFF);

        Theme {
            background: Color::Rgb(0x0C, 0x00, 0x1B),
            text: Color::Rgb(0xB0, 0xAA, 0xFF),
            text_bright: Color::Rgb(0xFF, 0xFF, 0xFF),
            highlight: Color::Rgb(0xFB, 0x41, 0x96),
            dim: Color::Rgb(0x7D, 0x78, 0xBF),
            red,
            yellow,
            green,
            cyan,
            selection_bg: Color::Rgb(0x3D, 0x14, 0x38),
            priority: [
                red,
                Color::Rgb(0xFF, 0x88, 0x33),
                yellow,
                green,
                cyan,
                Color::Rgb(0x44, 0x88, 0xFF),
            ],
        }
    }
}

/// Parse a hex color string like "#FF4444" into an RGB Color
fn parse_hex_color(hex: &str) -> Option<Color> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
    Some(Color::Rgb(r, g, b))
}

impl Theme {
    /// Create a theme from `[ui.colors]`, falling back to defaults
    pub fn from_config(ui: &UiConfig) -> Self {
        let mut theme = Theme::default();

        for (key, value) in &ui.colors {
            let Some(color) = parse_hex_color(value) else {
                tracing::warn!(key = %key, value = %value, "ignoring invalid color");
                continue;
            };
            match key.as_str() {
                "background" => theme.background = color,
                "text" => theme.text = color,
                "text_bright" => theme.text_bright = color,
                "highlight" => theme.highlight = color,
                "dim" => theme.dim = color,
                "red" => theme.red = color,
                "yellow" => theme.yellow = color,
                "green" => theme.green = color,
                "cyan" => theme.cyan = color,
                "selection_bg" => theme.selection_bg = color,
                other => match other.strip_prefix("priority_").and_then(priority_slot) {
                    Some(slot) => theme.priority[slot] = color,
                    None => tracing::warn!(key = %key, "ignoring unknown color key"),
                },
            }
        }

        theme
    }

    /// Color for a priority letter, falling back to text color
    pub fn priority_color(&self, priority: char) -> Color {
        COLORED_PRIORITIES
            .iter()
            .position(|&p| p == priority)
            .map_or(self.text, |i| self.priority[i])
    }
}

/// `"a"` -> 0 ... `"f"` -> 5
fn priority_slot(letter: &str) -> Option<usize> {
    let mut chars = letter.chars();
    let c = chars.next()?.to_ascii_uppercase();
    if chars.next().is_some() {
        return None;
    }
    COLORED_PRIORITIES.iter().position(|&p| p == c)
}
