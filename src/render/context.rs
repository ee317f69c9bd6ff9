use crate::config::Theme;
use ratatui::style::Color;

/// Snapshot of theme colors and display configuration for rendering.
/// Passed to widgets to avoid threading many individual parameters.
#[derive(Debug, Clone)]
pub struct RenderContext {
    pub keybind_hints: Color,
    pub keybind_labels: Color,
    pub controls_bg: Color,
    pub background: Color,
    pub text_primary: Color,
    pub text_secondary: Color,
    pub dimmed: Color,
    pub error: Color,
    pub modal_border: Color,
    pub modal_border_active: Color,
    pub modal_border_error: Color,
    pub throbber: Color,

    pub table_header: Color,
    pub table_header_bg: Color,
    pub highlight: Color,
    pub highlight_bg: Color,

    pub table_cell_padding: u16,
    pub percentages_in_cells: bool,
    pub show_lc_share: bool,
}

impl RenderContext {
    /// Build render context from app theme and display settings.
    /// This is a snapshot; changes to theme won't affect this instance.
    pub fn from_theme_and_config(
        theme: &Theme,
        table_cell_padding: u16,
        percentages_in_cells: bool,
        show_lc_share: bool,
    ) -> Self {
        Self {
            keybind_hints: theme.get("keybind_hints"),
            keybind_labels: theme.get("keybind_labels"),
            controls_bg: theme.get("controls_bg"),
            background: theme.get("background"),
            text_primary: theme.get("text_primary"),
            text_secondary: theme.get("text_secondary"),
            dimmed: theme.get("dimmed"),
            error: theme.get("error"),
            modal_border: theme.get("modal_border"),
            modal_border_active: theme.get("modal_border_active"),
            modal_border_error: theme.get("modal_border_error"),
            throbber: theme.get("throbber"),

            table_header: theme.get("table_header"),
            table_header_bg: theme.get("table_header_bg"),
            highlight: theme.get("highlight"),
            highlight_bg: theme.get("highlight_bg"),

            table_cell_padding,
            percentages_in_cells,
            show_lc_share,
        }
    }
}
