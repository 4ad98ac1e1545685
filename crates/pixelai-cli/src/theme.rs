use crossterm::style::Color;

#[derive(Clone)]
pub struct Theme {
    pub name: &'static str,
    pub fg: Color,
    pub accent: Color,
    pub muted: Color,
    pub error: Color,
    pub warning: Color,
    pub user_color: Color,
    pub assistant_color: Color,
}

impl Theme {
    pub fn dark() -> Self {
        Self {
            name: "dark",
            fg: Color::Rgb { r: 220, g: 220, b: 220 },
            accent: Color::Rgb { r: 122, g: 162, b: 247 },
            muted: Color::Rgb { r: 100, g: 100, b: 100 },
            error: Color::Rgb { r: 247, g: 118, b: 142 },
            warning: Color::Rgb { r: 224, g: 175, b: 104 },
            user_color: Color::Cyan,
            assistant_color: Color::Green,
        }
    }

    pub fn light() -> Self {
        Self {
            name: "light",
            fg: Color::Rgb { r: 30, g: 30, b: 30 },
            accent: Color::Rgb { r: 37, g: 99, b: 235 },
            muted: Color::Rgb { r: 110, g: 110, b: 110 },
            error: Color::Rgb { r: 200, g: 30, b: 60 },
            warning: Color::Rgb { r: 180, g: 110, b: 0 },
            user_color: Color::DarkBlue,
            assistant_color: Color::DarkGreen,
        }
    }

    pub fn for_mode(dark_mode: bool) -> Self {
        if dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }
}

/// Terminal-only view toggles. Nothing in the conversation model depends on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewState {
    pub dark_mode: bool,
    pub sidebar_open: bool,
}

impl ViewState {
    pub fn new(dark_mode: bool, sidebar_open: bool) -> Self {
        Self {
            dark_mode,
            sidebar_open,
        }
    }

    pub fn toggle_theme(&mut self) -> bool {
        self.dark_mode = !self.dark_mode;
        self.dark_mode
    }

    pub fn toggle_sidebar(&mut self) -> bool {
        self.sidebar_open = !self.sidebar_open;
        self.sidebar_open
    }

    pub fn theme(&self) -> Theme {
        Theme::for_mode(self.dark_mode)
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(true, true)
    }
}
