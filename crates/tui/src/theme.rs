use ratatui::style::Color;

pub struct Theme {
    pub border_focus: Color,
    pub border_inactive: Color,
    pub border_active_side: Color,
    pub left_accent: Color,
    pub right_accent: Color,
    pub muted: Color,
    pub placeholder: Color,
    pub history_selected_fg: Color,
    pub history_selected_bg: Color,
    pub toast_fg: Color,
    pub toast_bg: Color,
    pub toast_dot: Color,
}

pub const THEME: Theme = Theme {
    border_focus: Color::Cyan,
    border_inactive: Color::DarkGray,
    border_active_side: Color::Rgb(99, 102, 241),
    left_accent: Color::Rgb(129, 140, 248),
    right_accent: Color::Rgb(52, 211, 153),
    muted: Color::DarkGray,
    placeholder: Color::Rgb(55, 65, 81),
    history_selected_fg: Color::Black,
    history_selected_bg: Color::Cyan,
    toast_fg: Color::White,
    toast_bg: Color::Rgb(31, 41, 55),
    toast_dot: Color::Green,
};
