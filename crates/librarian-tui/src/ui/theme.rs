// Centralized theme - all colors live here

use ratatui::style::Color;

/// App background - pure black for contrast
pub const BG_APP: Color = Color::Rgb(0, 0, 0);

/// Input field background
pub const BG_INPUT: Color = Color::Rgb(18, 18, 18);

/// Primary text - off-white for readability
pub const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);

/// Secondary/muted text
pub const TEXT_MUTED: Color = Color::Rgb(128, 128, 128);

/// Dimmed text for hints, placeholders
pub const TEXT_DIM: Color = Color::Rgb(90, 90, 90);

/// Primary accent - muted blue (focus, interactive elements)
pub const ACCENT_PRIMARY: Color = Color::Rgb(86, 156, 214);

/// Success - muted green
pub const ACCENT_SUCCESS: Color = Color::Rgb(106, 153, 85);

/// Warning - muted amber
pub const ACCENT_WARNING: Color = Color::Rgb(206, 145, 120);

/// Error - muted red
pub const ACCENT_ERROR: Color = Color::Rgb(244, 112, 112);

/// The user's own turns in the transcript
pub const ROLE_USER: Color = Color::Rgb(86, 156, 214);

/// The librarian's turns in the transcript
pub const ROLE_ASSISTANT: Color = Color::Rgb(169, 154, 203);

/// Inactive border
pub const BORDER_INACTIVE: Color = Color::Rgb(60, 60, 60);
