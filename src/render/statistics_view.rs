//! Draws the class statistics dialog: busy and failure states, and the confusion table.

use crate::class_statistics_modal::{ClassStatisticsModal, FetchStatus};
use crate::help_strings;
use crate::render::context::RenderContext;
use crate::render::layout::centered_rect_with_min;
use crate::render::overlays::render_help_overlay;
use crate::statistics::{ParsedStatistics, UNDEFINED_PERCENT};
use crate::widgets::controls::format_count;
use ratatui::buffer::Buffer;
use ratatui::layout::{Constraint, Rect};
use ratatui::prelude::Widget;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

/// Rows taken by the table header and the class totals row.
const FIXED_ROWS: u16 = 2;

pub fn render_statistics_dialog(
    area: Rect,
    buf: &mut Buffer,
    dialog: &mut ClassStatisticsModal,
    ctx: &RenderContext,
) {
    let popup_area = centered_rect_with_min(area, 90, 85, 40, 8);
    Clear.render(popup_area, buf);

    let border_color = match dialog.status() {
        FetchStatus::Fetching => ctx.modal_border_active,
        FetchStatus::Failure(_) => ctx.modal_border_error,
        _ => ctx.modal_border,
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .title(format!(" Class statistics: {} ", dialog.output().display_name()))
        .border_style(Style::default().fg(border_color))
        .style(Style::default().bg(ctx.background));
    let inner = block.inner(popup_area);
    block.render(popup_area, buf);

    if let Some(message) = dialog.failure_message() {
        Paragraph::new(format!("{}\n\nPress r to try again.", message))
            .style(Style::default().fg(ctx.error))
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    } else if dialog.status().is_fetching() {
        Paragraph::new(format!(
            "Fetching statistics from {} ...",
            dialog.output().reference.url
        ))
        .style(Style::default().fg(ctx.text_secondary))
        .wrap(Wrap { trim: true })
        .render(inner, buf);
    } else if dialog.statistics().is_some() {
        let visible = inner.height.saturating_sub(FIXED_ROWS) as usize;
        let row_count = dialog.statistics().map_or(0, |s| s.lc_classes.len());
        dialog.scroll = dialog.scroll.min(row_count.saturating_sub(visible));
        if let Some(stats) = dialog.statistics() {
            statistics_table(stats, dialog.scroll, visible, ctx).render(inner, buf);
        }
    }

    if dialog.show_help {
        render_help_overlay(
            area,
            buf,
            " Class Statistics Help ",
            help_strings::class_statistics(),
            &mut dialog.help_scroll,
            ctx,
        );
    }
}

fn share_or_count(formatted: &str, count: u64, percentages: bool) -> String {
    if percentages {
        formatted.to_string()
    } else {
        format_count(count)
    }
}

fn value_style(highlighted: bool, empty: bool, ctx: &RenderContext) -> Style {
    if highlighted {
        Style::default()
            .fg(ctx.highlight)
            .bg(ctx.highlight_bg)
            .add_modifier(Modifier::BOLD)
    } else if empty {
        Style::default().fg(ctx.dimmed)
    } else {
        Style::default().fg(ctx.text_primary)
    }
}

/// Text of every row, header first, used for both sizing and drawing.
fn table_text(
    stats: &ParsedStatistics,
    ctx: &RenderContext,
) -> (Vec<String>, Vec<String>, Vec<Vec<String>>) {
    let mut header = vec!["Land cover".to_string(), "Pixels".to_string()];
    header.extend(stats.classes.iter().map(|c| c.label.clone()));

    let mut totals = vec!["Total".to_string(), format_count(stats.total)];
    totals.extend(
        stats
            .classes
            .iter()
            .map(|c| share_or_count(&c.formatted, c.count, ctx.percentages_in_cells)),
    );

    let rows = stats
        .lc_classes
        .iter()
        .map(|row| {
            let count = if ctx.show_lc_share {
                format!("{} ({})", format_count(row.count), row.formatted)
            } else {
                format_count(row.count)
            };
            let mut cells = vec![row.label.clone(), count];
            cells.extend(
                row.counts
                    .iter()
                    .map(|cell| share_or_count(&cell.formatted, cell.value, ctx.percentages_in_cells)),
            );
            cells
        })
        .collect();

    (header, totals, rows)
}

fn statistics_table<'a>(
    stats: &'a ParsedStatistics,
    scroll: usize,
    visible: usize,
    ctx: &RenderContext,
) -> Table<'a> {
    let (header, totals, rows) = table_text(stats, ctx);

    let widths: Vec<Constraint> = (0..header.len())
        .map(|col| {
            let widest = std::iter::once(&header)
                .chain(std::iter::once(&totals))
                .chain(rows.iter())
                .filter_map(|r| r.get(col))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0);
            Constraint::Length(widest as u16)
        })
        .collect();

    let header_row = Row::new(header).style(
        Style::default()
            .fg(ctx.table_header)
            .bg(ctx.table_header_bg)
            .add_modifier(Modifier::BOLD),
    );

    let mut totals_iter = totals.into_iter();
    let mut total_cells: Vec<Cell> = totals_iter
        .by_ref()
        .take(2)
        .map(|s| Cell::from(s).style(Style::default().add_modifier(Modifier::BOLD)))
        .collect();
    total_cells.extend(totals_iter.zip(&stats.classes).map(|(text, class)| {
        let undefined = text == UNDEFINED_PERCENT;
        Cell::from(text).style(value_style(class.highlighted, class.count == 0 || undefined, ctx))
    }));

    let mut table_rows = vec![Row::new(total_cells)];
    for (row, text) in stats
        .lc_classes
        .iter()
        .zip(rows)
        .skip(scroll)
        .take(visible.max(1))
    {
        let mut text = text.into_iter();
        let mut cells: Vec<Cell> = text
            .by_ref()
            .take(2)
            .map(|s| Cell::from(s).style(value_style(row.highlighted, false, ctx)))
            .collect();
        cells.extend(text.zip(&row.counts).map(|(s, cell)| {
            let undefined = s == UNDEFINED_PERCENT;
            Cell::from(s).style(value_style(cell.highlighted, cell.value == 0 || undefined, ctx))
        }));
        table_rows.push(Row::new(cells));
    }

    Table::new(table_rows, widths)
        .header(header_row)
        .column_spacing(ctx.table_cell_padding)
}
