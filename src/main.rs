use clap::Parser;
use color_eyre::eyre::eyre;
use color_eyre::Result;
use damats::cli::{fetcher_from_args_and_config, mime_type_from_args_and_config};
use damats::error_display::user_message_from_report;
use damats::widgets::controls::format_count;
use damats::{
    logging, App, AppConfig, AppEvent, Args, CacheManager, ClassStatisticsModal, ConfigManager,
    Fetch, Highlight, ParsedStatistics, PrintFormat, ProcessOutput, RequestTokens,
    StatisticsRequest, Theme, APP_NAME,
};
use ratatui::DefaultTerminal;
use std::sync::mpsc::channel;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

fn render(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    terminal.draw(|frame| frame.render_widget(app, frame.area()))?;
    Ok(())
}

fn run(
    mut terminal: DefaultTerminal,
    args: &Args,
    config: AppConfig,
    request: StatisticsRequest,
    fetcher: Arc<dyn Fetch>,
) -> Result<()> {
    let poll_interval = Duration::from_millis(config.performance.event_poll_interval_ms);
    let theme = Theme::from_config(&config.theme)?;

    let (tx, rx) = channel::<AppEvent>();
    let mut app = App::new_with_config(tx.clone(), fetcher, theme, config);
    if args.debug {
        app.enable_debug();
    }
    render(&mut terminal, &mut app)?;
    tx.send(AppEvent::DisplayClassStatistics(Box::new(request)))?;

    loop {
        if crossterm::event::poll(poll_interval)? {
            match crossterm::event::read()? {
                crossterm::event::Event::Key(key) => tx.send(AppEvent::Key(key))?,
                crossterm::event::Event::Resize(cols, rows) => {
                    tx.send(AppEvent::Resize(cols, rows))?
                }
                _ => {}
            }
        }

        let updated = match rx.recv_timeout(Duration::from_millis(0)) {
            Ok(event) => {
                match event {
                    AppEvent::Exit => break,
                    event => {
                        if let Some(event) = app.event(event) {
                            tx.send(event)?;
                        }
                    }
                }
                true
            }
            Err(std::sync::mpsc::RecvTimeoutError::Timeout) => {
                if app.is_busy() {
                    app.tick();
                    true
                } else {
                    false
                }
            }
            Err(std::sync::mpsc::RecvTimeoutError::Disconnected) => break,
        };

        if updated {
            render(&mut terminal, &mut app)?;
        }
    }
    Ok(())
}

fn handle_early_exit_flags(args: &Args) -> Result<Option<()>> {
    if args.clear_cache {
        match CacheManager::new(APP_NAME) {
            Ok(cache) => {
                if let Err(e) = cache.clear_all() {
                    eprintln!("Error clearing cache: {}", e);
                    std::process::exit(1);
                }
                println!("Cache cleared successfully");
            }
            Err(_e) => println!("No cache to clear"),
        }
        return Ok(Some(()));
    }

    if args.generate_config {
        match ConfigManager::new(APP_NAME) {
            Ok(manager) => match manager.write_default_config(args.force) {
                Ok(path) => {
                    println!("Configuration file written to {}", path.display());
                    return Ok(Some(()));
                }
                Err(e) => {
                    eprintln!("Error writing configuration file: {}", e);
                    std::process::exit(1);
                }
            },
            Err(e) => {
                eprintln!("Error initializing config manager: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(None)
}

/// Build the display request from `--output` or the positional reference.
fn request_from_args(args: &Args, config: &AppConfig) -> Result<StatisticsRequest> {
    let output = match (&args.output, &args.reference) {
        (Some(path), _) => {
            let mut output = ProcessOutput::load(path)?;
            if let Some(mime_type) = &args.mime_type {
                output.reference.mime_type = mime_type.clone();
            }
            output
        }
        (None, Some(reference)) => {
            ProcessOutput::from_reference(reference, &mime_type_from_args_and_config(args, config))
        }
        (None, None) => return Err(eyre!("No statistics reference given")),
    };
    Ok(StatisticsRequest::new(output, Highlight::from(args))?)
}

/// Plain-text rendering for `--print table`.
fn format_table(stats: &ParsedStatistics) -> String {
    let mut rows: Vec<Vec<String>> = Vec::with_capacity(stats.lc_classes.len() + 2);

    let mut header = vec!["Land cover".to_string(), "Pixels".to_string()];
    header.extend(stats.classes.iter().map(|c| c.label.clone()));
    rows.push(header);

    let mut totals = vec!["Total".to_string(), format_count(stats.total)];
    totals.extend(
        stats
            .classes
            .iter()
            .map(|c| format!("{} ({})", format_count(c.count), c.formatted)),
    );
    rows.push(totals);

    for row in &stats.lc_classes {
        let mut cells = vec![
            row.label.clone(),
            format!("{} ({})", format_count(row.count), row.formatted),
        ];
        cells.extend(row.counts.iter().map(|cell| cell.formatted.clone()));
        rows.push(cells);
    }

    let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            rows.iter()
                .filter_map(|r| r.get(col))
                .map(|s| s.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    for row in &rows {
        let line = row
            .iter()
            .zip(&widths)
            .enumerate()
            .map(|(col, (cell, width))| {
                if col == 0 {
                    format!("{:<width$}", cell, width = width)
                } else {
                    format!("{:>width$}", cell, width = width)
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

/// Non-interactive mode: run one fetch cycle on this thread and print the result.
fn print_statistics(
    request: StatisticsRequest,
    fetcher: &dyn Fetch,
    format: PrintFormat,
) -> Result<()> {
    let mut tokens = RequestTokens::new();
    let mut dialog = ClassStatisticsModal::new(request);
    dialog.show();
    let ticket = dialog
        .begin_fetch(&mut tokens)
        .ok_or_else(|| eyre!("Statistics dialog could not start a fetch"))?;
    let result = fetcher.fetch(&ticket.url, &ticket.mime_type);
    dialog.complete_fetch(ticket.token, result);

    if let Some(message) = dialog.failure_message() {
        return Err(eyre!(message));
    }
    match format {
        PrintFormat::Json => println!("{}", serde_json::to_string_pretty(&dialog.template())?),
        PrintFormat::Table => {
            if let Some(stats) = dialog.statistics() {
                print!("{}", format_table(stats));
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(()) = handle_early_exit_flags(&args)? {
        return Ok(());
    }

    color_eyre::install()?;

    let config = AppConfig::load(APP_NAME)?;
    let request = request_from_args(&args, &config)?;
    let fetcher = Arc::new(fetcher_from_args_and_config(&args, &config));

    if let Some(format) = args.print {
        logging::init_stderr_logging(&config.debug.log_level)?;
        if let Err(e) = print_statistics(request, fetcher.as_ref(), format) {
            eprintln!("Error: {}", user_message_from_report(&e));
            std::process::exit(1);
        }
        return Ok(());
    }

    if args.debug || config.debug.enabled {
        let cache = CacheManager::new(APP_NAME)?;
        let log_path = logging::init_file_logging(&cache, &config.debug.log_level)?;
        info!(log = %log_path.display(), "debug log started");
    }

    let terminal = ratatui::init();
    let result = run(terminal, &args, config, request, fetcher);
    ratatui::restore();
    if let Err(e) = result {
        eprintln!("Error: {}", user_message_from_report(&e));
        std::process::exit(1);
    }
    Ok(())
}
