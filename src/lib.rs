use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::panic::AssertUnwindSafe;
use std::sync::{mpsc::Sender, Arc};
use tracing::{debug, info};

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Wrap};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

pub mod cache;
pub mod class_statistics_controller;
pub mod class_statistics_modal;
pub mod cli;
pub mod config;
pub mod error;
pub mod error_display;
mod help_strings;
pub mod logging;
pub mod output;
mod render;
pub mod source;
pub mod statistics;
pub mod widgets;

pub use cache::CacheManager;
pub use class_statistics_controller::ClassStatisticsController;
pub use class_statistics_modal::{
    ClassStatisticsModal, ClassStatisticsTemplate, DialogLifecycle, FetchOutcome, FetchStatus,
    FetchTicket, RequestToken, RequestTokens,
};
pub use cli::{Args, PrintFormat};
pub use config::{AppConfig, ColorParser, ConfigManager, Theme};
pub use error::{FetchError, MalformedTableError, RequestError, StatisticsError};
pub use output::{ProcessOutput, ReferenceDescriptor, StatisticsRequest};
pub use source::{Fetch, HttpFetcher, LocalFetcher, SourceFetcher};
pub use statistics::{parse_statistics, Highlight, ParsedStatistics};

use render::context::RenderContext;
use render::layout::app_layout;
use render::statistics_view::render_statistics_dialog;
use widgets::controls::{Controls, DIALOG_CONTROLS};
use widgets::debug::DebugState;

/// Application name used for cache directory and other app-specific paths
pub const APP_NAME: &str = "damats";

/// Rows moved by PageUp / PageDown
const PAGE_ROWS: usize = 10;

/// Everything that flows through the app's event channel.
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16), // resized (width, height)
    /// Open a statistics dialog, replacing any open one.
    DisplayClassStatistics(Box<StatisticsRequest>),
    CloseDialog,
    DoFetchStatistics(FetchTicket), // Internal event to start the fetch after the dialog renders
    StatisticsFetched(RequestToken, Result<String, FetchError>),
    Refetch,
    Exit,
}

pub struct App {
    events: Sender<AppEvent>,
    fetcher: Arc<dyn Fetch>,
    statistics: ClassStatisticsController,
    theme: Theme,
    config: AppConfig,
    percentages_in_cells: bool,
    throbber_frame: u8,
    debug: DebugState,
}

impl App {
    pub fn new(events: Sender<AppEvent>, fetcher: Arc<dyn Fetch>) -> App {
        let config = AppConfig::default();
        let theme = Theme::from_config(&config.theme).unwrap_or_default();
        Self::new_with_config(events, fetcher, theme, config)
    }

    pub fn new_with_config(
        events: Sender<AppEvent>,
        fetcher: Arc<dyn Fetch>,
        theme: Theme,
        app_config: AppConfig,
    ) -> App {
        App {
            events,
            fetcher,
            statistics: ClassStatisticsController::new(),
            theme,
            percentages_in_cells: app_config.display.percentages_in_cells,
            debug: DebugState {
                enabled: app_config.debug.enabled,
                ..DebugState::default()
            },
            config: app_config,
            throbber_frame: 0,
        }
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn debug_state(&self) -> &DebugState {
        &self.debug
    }

    pub fn statistics(&self) -> &ClassStatisticsController {
        &self.statistics
    }

    pub fn percentages_in_cells(&self) -> bool {
        self.percentages_in_cells
    }

    /// True while the open dialog waits for its fetch.
    pub fn is_busy(&self) -> bool {
        self.statistics
            .dialog()
            .is_some_and(|d| d.status().is_fetching())
    }

    /// Advance the busy indicator.
    pub fn tick(&mut self) {
        self.throbber_frame = self.throbber_frame.wrapping_add(1);
    }

    pub fn event(&mut self, event: AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(&key),
            AppEvent::Resize(..) => None,
            AppEvent::DisplayClassStatistics(request) => {
                self.debug.last_action = "open_dialog".to_string();
                self.statistics.on_request(*request)
            }
            AppEvent::CloseDialog => {
                self.debug.last_action = "close_dialog".to_string();
                self.statistics.on_close();
                // The dialog is the whole app
                Some(AppEvent::Exit)
            }
            AppEvent::DoFetchStatistics(ticket) => {
                self.spawn_fetch(ticket);
                None
            }
            AppEvent::StatisticsFetched(token, result) => {
                match self.statistics.on_fetched(token, result) {
                    FetchOutcome::Applied => {}
                    FetchOutcome::Stale | FetchOutcome::Closed => self.debug.stale_results += 1,
                }
                None
            }
            AppEvent::Refetch => {
                self.debug.last_action = "refetch".to_string();
                self.statistics.refetch()
            }
            // Handled by the event loop
            AppEvent::Exit => None,
        }
    }

    /// Run the fetch on a worker thread; the result comes back as `StatisticsFetched`.
    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        self.debug.fetches_started += 1;
        self.debug.last_token = Some(ticket.token.0);

        let fetcher = Arc::clone(&self.fetcher);
        let events = self.events.clone();
        std::thread::spawn(move || {
            // A panicking fetcher still has to settle the dialog
            let result = std::panic::catch_unwind(AssertUnwindSafe(|| {
                fetcher.fetch(&ticket.url, &ticket.mime_type)
            }))
            .unwrap_or_else(|_| {
                Err(FetchError::Transport {
                    url: ticket.url.clone(),
                    message: "fetch worker panicked".to_string(),
                })
            });
            info!(
                token = ticket.token.0,
                ok = result.is_ok(),
                "statistics fetch finished"
            );
            if events
                .send(AppEvent::StatisticsFetched(ticket.token, result))
                .is_err()
            {
                debug!(token = ticket.token.0, "event channel closed before fetch finished");
            }
        });
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        if event.kind != KeyEventKind::Press {
            return None;
        }
        self.debug.on_key(event);

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        let Some(dialog) = self.statistics.dialog_mut() else {
            return match event.code {
                KeyCode::Char('q') | KeyCode::Esc => Some(AppEvent::Exit),
                _ => None,
            };
        };

        if dialog.show_help {
            match event.code {
                KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q') => dialog.toggle_help(),
                KeyCode::Up | KeyCode::Char('k') => {
                    dialog.help_scroll = dialog.help_scroll.saturating_sub(1)
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    dialog.help_scroll = dialog.help_scroll.saturating_add(1)
                }
                KeyCode::PageUp => {
                    dialog.help_scroll = dialog.help_scroll.saturating_sub(PAGE_ROWS)
                }
                KeyCode::PageDown => {
                    dialog.help_scroll = dialog.help_scroll.saturating_add(PAGE_ROWS)
                }
                _ => {}
            }
            return None;
        }

        match event.code {
            KeyCode::Up | KeyCode::Char('k') => dialog.scroll_up(1),
            KeyCode::Down | KeyCode::Char('j') => dialog.scroll_down(1),
            KeyCode::PageUp => dialog.scroll_up(PAGE_ROWS),
            KeyCode::PageDown => dialog.scroll_down(PAGE_ROWS),
            KeyCode::Home => dialog.scroll_to_top(),
            KeyCode::End => dialog.scroll_to_bottom(),
            KeyCode::Char('?') => dialog.toggle_help(),
            KeyCode::Char('p') => {
                self.percentages_in_cells = !self.percentages_in_cells;
                self.debug.last_action = "toggle_percentages".to_string();
            }
            KeyCode::Char('r') => return Some(AppEvent::Refetch),
            KeyCode::Esc | KeyCode::Char('q') => return Some(AppEvent::CloseDialog),
            _ => {}
        }
        None
    }

    fn render_context(&self) -> RenderContext {
        RenderContext::from_theme_and_config(
            &self.theme,
            u16::try_from(self.config.display.table_cell_padding).unwrap_or(u16::MAX),
            self.percentages_in_cells,
            self.config.display.show_lc_share,
        )
    }
}

/// Background panel: what is being looked at.
fn output_summary<'a>(output: &'a ProcessOutput, ctx: &RenderContext) -> Vec<Line<'a>> {
    let label = Style::default().fg(ctx.text_secondary);
    let mut lines = vec![
        Line::from(Span::styled(
            output.display_name(),
            Style::default()
                .fg(ctx.text_primary)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(vec![
            Span::styled("reference: ", label),
            Span::raw(output.reference.url.as_str()),
        ]),
        Line::from(vec![
            Span::styled("mime type: ", label),
            Span::raw(output.reference.mime_type.as_str()),
        ]),
    ];
    for (key, value) in &output.extra {
        let value = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", key), label),
            Span::raw(value),
        ]));
    }
    lines
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;
        let ctx = self.render_context();

        Block::default()
            .style(Style::default().bg(ctx.background))
            .render(area, buf);

        let layout = app_layout(area, self.debug.enabled);

        if let Some(dialog) = self.statistics.dialog() {
            Paragraph::new(output_summary(dialog.output(), &ctx))
                .wrap(Wrap { trim: false })
                .render(layout.main_view, buf);
        } else {
            Paragraph::new("No statistics open.")
                .style(Style::default().fg(ctx.text_secondary))
                .render(layout.main_view, buf);
        }

        if let Some(dialog) = self.statistics.dialog_mut() {
            render_statistics_dialog(layout.main_view, buf, dialog, &ctx);
        }

        let use_unicode_throbber = std::env::var("LANG")
            .map(|l| l.to_uppercase().contains("UTF-8"))
            .unwrap_or(false);
        let busy = self.is_busy();
        let mut controls = Controls::from_context(&ctx)
            .with_unicode_throbber(use_unicode_throbber)
            .with_busy(busy, self.throbber_frame);
        if let Some(dialog) = self.statistics.dialog() {
            controls = controls
                .with_custom_controls(DIALOG_CONTROLS.to_vec())
                .with_pixel_total(dialog.statistics().map(|s| s.total));
        }
        (&controls).render(layout.control_bar, buf);

        if let Some(debug_area) = layout.debug {
            (&self.debug).render(debug_area, buf);
        }
    }
}
