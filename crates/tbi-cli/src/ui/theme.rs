//! UI Theme - Design system constants

use crossterm::style::Color;

/// Default theme for tbi output
#[derive(Debug, Clone)]
pub struct Theme {
    pub colors: ColorScheme,
    pub icons: Icons,
    pub layout: Layout,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            colors: ColorScheme::default(),
            icons: Icons::default(),
            layout: Layout::default(),
        }
    }
}

/// Color scheme for UI elements
#[derive(Debug, Clone)]
pub struct ColorScheme {
    /// Application names (primary content)
    pub app_name: Color,
    /// Version numbers
    pub version: Color,
    /// Ids, dates and secondary info
    pub secondary: Color,
    /// Headers and labels
    pub header: Color,
    pub success: Color,
    pub warning: Color,
    pub error: Color,
}

impl Default for ColorScheme {
    fn default() -> Self {
        Self {
            app_name: Color::Cyan,
            version: Color::White,
            secondary: Color::DarkGrey,
            header: Color::DarkGrey,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
        }
    }
}

/// Status icons
#[derive(Debug, Clone)]
pub struct Icons {
    pub success: &'static str,
    pub error: &'static str,
    pub warning: &'static str,
}

impl Default for Icons {
    fn default() -> Self {
        Self {
            success: "✓",
            error: "✗",
            warning: "⚠",
        }
    }
}

/// Column widths for `tbi list`
#[derive(Debug, Clone)]
pub struct Layout {
    pub name_width: usize,
    pub version_width: usize,
    pub id_width: usize,
    /// Width of the label column in `tbi info` and `tbi analyze`
    pub label_width: usize,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            name_width: 24,
            version_width: 10,
            id_width: 30,
            label_width: 14,
        }
    }
}
