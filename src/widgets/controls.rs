use crate::render::context::RenderContext;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Paragraph, Widget},
};

/// Key hints shown while a statistics dialog is open.
pub const DIALOG_CONTROLS: [(&str, &str); 6] = [
    ("↑↓", "Scroll"),
    ("r", "Refetch"),
    ("p", "Shares/Counts"),
    ("?", "Help"),
    ("q", "Close"),
    ("^C", "Quit"),
];

pub struct Controls {
    /// Grand total of the shown table, right-aligned when known
    pub pixel_total: Option<u64>,
    pub custom_controls: Option<Vec<(&'static str, &'static str)>>,
    pub bg_color: Color,
    pub key_color: Color,   // Color for keybind hints (keys in toolbar)
    pub label_color: Color, // Color for action labels
    pub throbber_color: Color,
    pub use_unicode_throbber: bool, // When true, use 8-dot braille spinner; else |/-\
    pub busy: bool,                 // When true, show throbber at far right
    pub throbber_frame: u8,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            pixel_total: None,
            custom_controls: None,
            bg_color: Color::Indexed(236),
            key_color: Color::Cyan,
            label_color: Color::White,
            throbber_color: Color::Cyan,
            use_unicode_throbber: false,
            busy: false,
            throbber_frame: 0,
        }
    }
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create Controls themed from a RenderContext.
    pub fn from_context(ctx: &RenderContext) -> Self {
        Self {
            bg_color: ctx.controls_bg,
            key_color: ctx.keybind_hints,
            label_color: ctx.keybind_labels,
            throbber_color: ctx.throbber,
            ..Self::default()
        }
    }

    pub fn with_pixel_total(mut self, total: Option<u64>) -> Self {
        self.pixel_total = total;
        self
    }

    pub fn with_busy(mut self, busy: bool, throbber_frame: u8) -> Self {
        self.busy = busy;
        self.throbber_frame = throbber_frame;
        self
    }

    pub fn with_custom_controls(mut self, controls: Vec<(&'static str, &'static str)>) -> Self {
        self.custom_controls = Some(controls);
        self
    }

    pub fn with_unicode_throbber(mut self, use_unicode: bool) -> Self {
        self.use_unicode_throbber = use_unicode;
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let no_bg = self.bg_color == Color::Reset;
        if !no_bg {
            Block::default()
                .style(Style::default().bg(self.bg_color))
                .render(area, buf);
        }

        const DEFAULT_CONTROLS: [(&str, &str); 2] = [("Enter", "Open"), ("q", "Quit")];

        let controls: Vec<(&str, &str)> = match &self.custom_controls {
            Some(custom) => custom.to_vec(),
            None => DEFAULT_CONTROLS.to_vec(),
        };

        // Key: key + 1 trailing space. Label: action + 1 trailing space before next key.
        let pair_width = |(key, action): &(&str, &str)| -> u16 {
            (key.chars().count() as u16 + 1) + (action.chars().count() as u16 + 1)
        };

        // Fixed reservation for total and throbber so layout never shifts.
        const THROBBER_WIDTH: u16 = 3;
        const TOTAL_WIDTH: u16 = 24;
        let right_reserved =
            (if self.pixel_total.is_some() { TOTAL_WIDTH + 1 } else { 1 }) + THROBBER_WIDTH;
        let mut available = area.width.saturating_sub(right_reserved);

        let mut n_show = 0;
        for pair in controls.iter() {
            let need = pair_width(pair);
            if available < need {
                break;
            }
            available -= need;
            n_show += 1;
        }

        let mut constraints: Vec<Constraint> = controls
            .iter()
            .take(n_show)
            .flat_map(|(key, action)| {
                [
                    Constraint::Length(key.chars().count() as u16 + 1),
                    Constraint::Length(action.chars().count() as u16 + 1),
                ]
            })
            .collect();

        constraints.push(Constraint::Fill(1));
        if self.pixel_total.is_some() {
            constraints.push(Constraint::Length(TOTAL_WIDTH));
        }
        constraints.push(Constraint::Length(THROBBER_WIDTH));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);

        let (key_style, label_style, fill_style) = if no_bg {
            (
                Style::default().fg(self.key_color),
                Style::default().fg(self.label_color),
                Style::default(),
            )
        } else {
            let base = Style::default().bg(self.bg_color);
            (base.fg(self.key_color), base.fg(self.label_color), base)
        };

        for (i, (key, action)) in controls.iter().take(n_show).enumerate() {
            let j = i * 2;
            Paragraph::new(*key).style(key_style).render(layout[j], buf);
            Paragraph::new(*action)
                .style(label_style)
                .render(layout[j + 1], buf);
        }

        let fill_idx = n_show * 2;
        Paragraph::new("")
            .style(fill_style)
            .render(layout[fill_idx], buf);

        if let Some(total) = self.pixel_total {
            Paragraph::new(format!("Pixels: {}", format_count(total)))
                .style(label_style)
                .right_aligned()
                .render(layout[fill_idx + 1], buf);
        }

        // Throbber slot is always present; animate only when busy.
        const THROBBER_ASCII: [char; 4] = ['|', '/', '-', '\\'];
        const THROBBER_BRAILLE_EIGHT: [char; 8] = ['⣷', '⣯', '⣟', '⡿', '⢿', '⣻', '⣽', '⣾'];
        let throbber_idx = fill_idx + if self.pixel_total.is_some() { 2 } else { 1 };
        let throbber_ch = if !self.busy {
            ' '
        } else if self.use_unicode_throbber {
            THROBBER_BRAILLE_EIGHT[self.throbber_frame as usize % 8]
        } else {
            THROBBER_ASCII[self.throbber_frame as usize % 4]
        };
        let throbber_style = if no_bg {
            Style::default().fg(self.throbber_color)
        } else {
            Style::default().bg(self.bg_color).fg(self.throbber_color)
        };
        Paragraph::new(throbber_ch.to_string())
            .style(throbber_style)
            .centered()
            .render(layout[throbber_idx], buf);
    }
}

/// Group digits in threes: 1234567 → "1,234,567".
pub fn format_count(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let chars: Vec<char> = s.chars().rev().collect();

    for (i, ch) in chars.iter().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(*ch);
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");
        assert_eq!(format_count(1234567), "1,234,567");
    }

    #[test]
    fn test_controls_render_hints_and_total() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        let controls = Controls::new()
            .with_custom_controls(DIALOG_CONTROLS.to_vec())
            .with_pixel_total(Some(12345));
        (&controls).render(area, &mut buf);
        let text = line(&buf, 0);
        assert!(text.contains("Refetch"), "got: {}", text);
        assert!(text.contains("Pixels: 12,345"), "got: {}", text);
    }

    #[test]
    fn test_controls_drop_hints_that_do_not_fit() {
        let area = Rect::new(0, 0, 20, 1);
        let mut buf = Buffer::empty(area);
        let controls = Controls::new().with_custom_controls(DIALOG_CONTROLS.to_vec());
        (&controls).render(area, &mut buf);
        let text = line(&buf, 0);
        assert!(text.contains("Scroll"), "got: {}", text);
        assert!(!text.contains("Help"), "got: {}", text);
    }

    #[test]
    fn test_throbber_only_when_busy() {
        let area = Rect::new(0, 0, 30, 1);
        let mut buf = Buffer::empty(area);
        let controls = Controls::new()
            .with_custom_controls(vec![])
            .with_busy(true, 1);
        (&controls).render(area, &mut buf);
        assert!(line(&buf, 0).contains('/'));
    }
}
