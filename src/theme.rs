use ratatui::style::{Color, Modifier, Style};

pub struct Theme {
    pub root_bg: Color,
    pub accent: Color,
    pub accent_secondary: Color,
    pub focus_border: Color,
    pub blurred_border: Color,
    pub text: Color,
    pub text_secondary: Color,

    // Specific components
    pub title: Style,
    pub step_active: Style,
    pub step_idle: Style,
    pub card: Style,
    pub card_cursor: Style,
    pub card_selected: Style,
    pub card_description: Style,
    pub button: Style,
    pub button_disabled: Style,
    pub input: Style,
    pub dialogue: Style,
    pub story_title: Style,
    pub loading: Style,
    pub footer: Style,
    pub status: Style,
    pub popup_border: Style,
    pub popup_text: Style,
}

impl Default for Theme {
    fn default() -> Self {
        let accent = Color::Rgb(0x64, 0xff, 0xda);
        let accent_secondary = Color::Rgb(0x00, 0xbc, 0xd4);
        Self {
            root_bg: Color::Rgb(0x0a, 0x0e, 0x27),
            accent,
            accent_secondary,
            focus_border: accent,
            blurred_border: Color::DarkGray,
            text: Color::White,
            text_secondary: Color::Gray,

            title: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            step_active: Style::default().fg(accent).add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            step_idle: Style::default().fg(Color::Gray),
            card: Style::default().fg(Color::White),
            card_cursor: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            card_selected: Style::default().fg(accent).add_modifier(Modifier::BOLD),
            card_description: Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
            button: Style::default().fg(Color::Black).bg(accent).add_modifier(Modifier::BOLD),
            button_disabled: Style::default().fg(Color::DarkGray).add_modifier(Modifier::DIM),
            input: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            dialogue: Style::default().fg(accent_secondary).add_modifier(Modifier::ITALIC),
            story_title: Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            loading: Style::default().fg(accent_secondary).add_modifier(Modifier::BOLD),
            footer: Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
            status: Style::default().fg(Color::Green),
            popup_border: Style::default().fg(Color::Magenta).bg(Color::Black),
            popup_text: Style::default().fg(Color::White),
        }
    }
}
