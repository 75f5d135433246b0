use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use color_eyre::Result;
use color_eyre::eyre::eyre;
use hostpulse::app::App;
use hostpulse::config::{Config, LoggingConfig, load_config, load_config_from_path};
use hostpulse::event::{Event, EventHandler};
use hostpulse::runtime;
use hostpulse::system::collector::SysinfoSource;
use hostpulse::system::sampler::Sampler;
use hostpulse::ui;
use hostpulse::ui::theme::Theme;

#[derive(Parser)]
#[command(
    name = "hostpulse",
    about = "Live host resource monitor: CPU, memory, disk, battery, network and top processes"
)]
struct Cli {
    /// Path to config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sampling interval in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Number of samples kept for the history graphs
    #[arg(long)]
    history: Option<usize>,

    /// Number of processes in the top-process list
    #[arg(long)]
    top_k: Option<usize>,

    /// Path whose filesystem is reported as disk usage
    #[arg(long)]
    disk_path: Option<PathBuf>,

    /// Print one JSON snapshot per line instead of drawing the dashboard.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Stop after this many snapshots (JSON mode only).
    #[arg(long, requires = "json")]
    count: Option<u64>,

    /// Log level: error, warn, info, debug, trace
    #[arg(long)]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = load_config_for_cli(&cli);
    init_logging(&config.logging, cli.json)?;

    runtime::block_on_with_grace(run(cli, config), runtime::SHUTDOWN_GRACE)?
}

async fn run(cli: Cli, config: Config) -> Result<()> {
    let sampler = Sampler::new(SysinfoSource::new(), config.sampler.settings());
    sampler.start(config.sampler.interval()).await?;

    let result = if cli.json {
        run_json(&sampler, cli.count).await
    } else {
        run_dashboard(&sampler, &config).await
    };

    sampler.stop().await;
    result
}

async fn run_dashboard(sampler: &Sampler, config: &Config) -> Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        ratatui::restore();
        original_hook(panic_info);
    }));

    let result = dashboard_loop(&mut terminal, sampler, config).await;

    ratatui::restore();
    result
}

async fn dashboard_loop(
    terminal: &mut ratatui::DefaultTerminal,
    sampler: &Sampler,
    config: &Config,
) -> Result<()> {
    let mut app = App::new(
        config.sampler.name_width,
        config.sampler.top_k,
        Theme::from_config(&config.ui.theme),
    );
    let mut events = EventHandler::new(sampler.subscribe());

    terminal.draw(|frame| ui::draw(frame, &app))?;

    while app.running {
        let Some(event) = events.next().await else {
            break;
        };
        match event {
            Event::Key(key) => {
                if key.kind == crossterm::event::KeyEventKind::Press {
                    let action = app.map_key(key);
                    app.dispatch(action);
                }
            }
            Event::Snapshot(snapshot) => app.on_snapshot(*snapshot),
            Event::Resize => {}
        }
        if app.running {
            terminal.draw(|frame| ui::draw(frame, &app))?;
        }
    }

    Ok(())
}

async fn run_json(sampler: &Sampler, count: Option<u64>) -> Result<()> {
    let mut snapshots = sampler.subscribe();
    let mut printed = 0u64;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let Some(snapshot) = snapshots.borrow_and_update().clone() else {
                    continue;
                };
                let line = serde_json::to_string(&snapshot)?;
                let mut stdout = std::io::stdout().lock();
                if writeln!(stdout, "{line}").and_then(|_| stdout.flush()).is_err() {
                    // Downstream closed the pipe.
                    break;
                }
                printed += 1;
                if count.is_some_and(|n| printed >= n) {
                    break;
                }
            }
        }
    }

    Ok(())
}

fn load_config_for_cli(cli: &Cli) -> Config {
    let mut config = match &cli.config {
        Some(path) => load_config_from_path(path),
        None => load_config(),
    };

    if let Some(interval) = cli.interval_ms {
        config.sampler.interval_ms = interval;
    }
    if let Some(history) = cli.history {
        config.sampler.history_len = history;
    }
    if let Some(top_k) = cli.top_k {
        config.sampler.top_k = top_k;
    }
    if let Some(ref path) = cli.disk_path {
        config.sampler.disk_path = path.clone();
    }
    if let Some(ref level) = cli.log_level {
        config.logging.level = level.clone();
    }

    config
}

/// JSON mode logs JSON to stderr so stdout stays machine readable. The
/// dashboard owns the terminal, so it only logs when a file is configured.
fn init_logging(logging: &LoggingConfig, json: bool) -> Result<()> {
    let level = logging
        .level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::INFO);

    if json {
        tracing_subscriber::fmt()
            .with_ansi(false)
            .json()
            .with_max_level(level)
            .with_writer(std::io::stderr)
            .try_init()
            .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    } else if let Some(path) = &logging.file {
        ensure_parent_dir(path)?;
        let file = File::options().create(true).append(true).open(path)?;
        tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(level)
            .with_writer(Mutex::new(file))
            .try_init()
            .map_err(|e| eyre!("failed to set tracing subscriber: {e}"))?;
    }
    Ok(())
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    Ok(())
}
