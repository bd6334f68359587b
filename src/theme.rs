use catppuccin::{Flavor, PALETTE};
use ratatui::style::Color;
use ratatui::widgets::BorderType;

const fn rgb(c: &catppuccin::Color) -> Color {
    Color::Rgb(c.rgb.r, c.rgb.g, c.rgb.b)
}

/// Colors used by the chrome and every screen, resolved from a Catppuccin flavor.
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    pub base: Color,
    pub surface0: Color,
    pub surface2: Color,
    pub overlay0: Color,
    pub overlay1: Color,
    pub text: Color,
    pub subtext0: Color,
    pub subtext1: Color,
    pub mauve: Color,
    pub red: Color,
    pub peach: Color,
    pub yellow: Color,
    pub green: Color,
    pub blue: Color,
    pub lavender: Color,
    pub border_type: BorderType,
}

impl Theme {
    const fn from_flavor(flavor: &Flavor) -> Self {
        let c = &flavor.colors;
        Self {
            base: rgb(&c.base),
            surface0: rgb(&c.surface0),
            surface2: rgb(&c.surface2),
            overlay0: rgb(&c.overlay0),
            overlay1: rgb(&c.overlay1),
            text: rgb(&c.text),
            subtext0: rgb(&c.subtext0),
            subtext1: rgb(&c.subtext1),
            mauve: rgb(&c.mauve),
            red: rgb(&c.red),
            peach: rgb(&c.peach),
            yellow: rgb(&c.yellow),
            green: rgb(&c.green),
            blue: rgb(&c.blue),
            lavender: rgb(&c.lavender),
            border_type: BorderType::Rounded,
        }
    }

    pub const fn base(&self) -> Color {
        self.base
    }

    pub const fn surface0(&self) -> Color {
        self.surface0
    }

    pub const fn surface2(&self) -> Color {
        self.surface2
    }

    pub const fn overlay0(&self) -> Color {
        self.overlay0
    }

    pub const fn overlay1(&self) -> Color {
        self.overlay1
    }

    pub const fn text(&self) -> Color {
        self.text
    }

    pub const fn subtext0(&self) -> Color {
        self.subtext0
    }

    pub const fn subtext1(&self) -> Color {
        self.subtext1
    }

    pub const fn mauve(&self) -> Color {
        self.mauve
    }

    pub const fn red(&self) -> Color {
        self.red
    }

    pub const fn peach(&self) -> Color {
        self.peach
    }

    pub const fn yellow(&self) -> Color {
        self.yellow
    }

    pub const fn green(&self) -> Color {
        self.green
    }

    pub const fn blue(&self) -> Color {
        self.blue
    }

    pub const fn lavender(&self) -> Color {
        self.lavender
    }

    // Semantic roles

    pub const fn border(&self) -> Color {
        self.surface2
    }

    pub const fn border_focused(&self) -> Color {
        self.lavender
    }

    pub const fn header(&self) -> Color {
        self.blue
    }

    pub const fn selection_bg(&self) -> Color {
        self.surface0
    }

    pub const fn error(&self) -> Color {
        self.red
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::from_flavor(&PALETTE.mocha)
    }
}

/// Names accepted by `theme.name` in the config file.
pub const THEME_NAMES: [&str; 4] = [
    "Catppuccin Mocha",
    "Catppuccin Macchiato",
    "Catppuccin Frappé",
    "Catppuccin Latte",
];

/// Look up a theme by name, falling back to Mocha for unknown names.
pub fn theme_from_name(name: &str) -> Theme {
    let flavor = match name {
        "Catppuccin Latte" => &PALETTE.latte,
        "Catppuccin Frappé" | "Catppuccin Frappe" => &PALETTE.frappe,
        "Catppuccin Macchiato" => &PALETTE.macchiato,
        _ => &PALETTE.mocha,
    };
    Theme::from_flavor(flavor)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_name_falls_back_to_mocha() {
        let fallback = theme_from_name("Solarized");
        assert_eq!(fallback.base, Theme::default().base);
    }

    #[test]
    fn test_every_listed_name_resolves() {
        let latte = theme_from_name("Catppuccin Latte");
        assert_ne!(latte.base, Theme::default().base);
        for name in THEME_NAMES {
            let _ = theme_from_name(name);
        }
    }
}
