use deployw::app::AppState;
use deployw::cli::Cli;
use deployw::client::HttpCiClient;
use deployw::config::DeployConfig;
use deployw::deploy::{Deployer, Host, TriggerOutcome};
use deployw::events::{AppEvent, EventHandler};
use deployw::input::{self, Action, InputContext, OverlayMode};
use deployw::notify::ChannelNotifier;
use deployw::traits::{CiClient, Notifier};
use deployw::tui;

use clap::Parser;
use color_eyre::eyre::{eyre, Result};
use crossterm::execute;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen, SetTitle};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

fn setup_verbose_logging() -> Result<()> {
    let state_dir = state_dir();
    std::fs::create_dir_all(&state_dir)
        .map_err(|e| eyre!("Failed to create log directory {state_dir:?}: {e}"))?;
    let log_path = state_dir.join("debug.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .map_err(|e| eyre!("Failed to open log file {log_path:?}: {e}"))?;
    tracing_subscriber::fmt()
        .with_writer(file)
        .with_ansi(false)
        .init();
    tracing::info!(
        "deployw v{} starting with verbose logging",
        env!("CARGO_PKG_VERSION")
    );
    Ok(())
}

fn state_dir() -> std::path::PathBuf {
    if let Some(state) = std::env::var_os("XDG_STATE_HOME") {
        std::path::PathBuf::from(state).join("deployw")
    } else if let Some(home) = std::env::var_os("HOME") {
        std::path::PathBuf::from(home)
            .join(".local")
            .join("state")
            .join("deployw")
    } else {
        std::path::PathBuf::from("/tmp/deployw")
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Cli::parse();

    if args.verbose {
        setup_verbose_logging()?;
    }

    // Installation parameters are validated before touching the terminal.
    let mut config = match DeployConfig::load(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    if let Some(secs) = args.interval {
        config.poll_interval = Duration::from_secs(secs);
    }
    tracing::info!(
        environments = config.environments.len(),
        poll_interval_secs = config.poll_interval.as_secs(),
        "configuration loaded from {:?}",
        args.config
    );

    let client: Arc<dyn CiClient> = Arc::new(HttpCiClient::new(config.request_timeout)?);
    let mut events = EventHandler::new(Duration::from_millis(100));
    let tx = events.sender();
    let notifier: Arc<dyn Notifier> = Arc::new(ChannelNotifier::new(tx.clone(), !args.no_notify));

    let mut state = AppState::new(&config);
    state.config.version_string = format!(
        "deployw v{}+{}",
        env!("CARGO_PKG_VERSION"),
        env!("BUILD_NUMBER")
    );
    let mut deployer = Deployer::new(Host { config, notifier }, client, tx);

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        if let Err(e) = terminal::disable_raw_mode() {
            eprintln!("Failed to disable raw mode during panic: {e}");
        }
        if let Err(e) = execute!(io::stdout(), LeaveAlternateScreen, SetTitle("")) {
            eprintln!("Failed to leave alternate screen during panic: {e}");
        }
        original_hook(panic_info);
    }));

    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, SetTitle("deployw"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut state, &mut events, &mut deployer).await;

    // Teardown: no poll may outlive the widget.
    deployer.cancel_poll();
    events.stop();

    terminal::disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, SetTitle(""))?;
    terminal.show_cursor()?;

    result
}

fn start_trigger(state: &mut AppState, deployer: &mut Deployer, environment: &str) {
    state.begin_trigger(environment);
    if !deployer.trigger_deployment(environment) {
        state.trigger_failed(environment);
    }
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    state: &mut AppState,
    events: &mut EventHandler,
    deployer: &mut Deployer,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| tui::render::render(f, state))?;

        state.prune_notifications();
        state.prune_error();

        let Some(event) = events.next().await else {
            return Ok(());
        };
        match event {
            AppEvent::Key(key) => {
                let ctx = InputContext {
                    has_error: state.error.is_some(),
                    menu_open: state.menu_open,
                    overlay: if state.has_confirm_overlay() {
                        OverlayMode::Confirm
                    } else {
                        OverlayMode::None
                    },
                };
                match input::map_key(key, &ctx) {
                    Action::Quit => state.should_quit = true,
                    Action::DismissError => state.clear_error(),
                    Action::ToggleMenu => state.toggle_menu(),
                    Action::CloseMenu => state.close_menu(),
                    Action::MoveUp => state.move_cursor_up(),
                    Action::MoveDown => state.move_cursor_down(),
                    Action::Select => state.select_current(),
                    Action::QuickSelect(n) => state.quick_select(n),
                    Action::Confirm => {
                        if let Some(environment) = state.take_confirmed() {
                            start_trigger(state, deployer, &environment);
                        }
                    }
                    Action::CancelConfirm => state.close_confirm_overlay(),
                    Action::RefreshBadge => {
                        if !deployer.refresh_now() {
                            state.set_error("Nothing to refresh: no deployment is being watched".to_string());
                        }
                    }
                    Action::StopPolling => {
                        deployer.stop();
                        state.stop_polling();
                    }
                    Action::None => {}
                }
            }
            AppEvent::Tick => {
                if last_tick.elapsed() >= Duration::from_millis(100) {
                    state.advance_spinner();
                    last_tick = Instant::now();
                }
            }
            // Redrawn at the top of the loop at the new size.
            AppEvent::Resize => {}
            AppEvent::TriggerFinished {
                environment,
                generation,
                result,
            } => match deployer.handle_trigger_finished(&environment, generation, &result) {
                TriggerOutcome::Accepted => state.trigger_accepted(&environment),
                TriggerOutcome::Failed => state.trigger_failed(&environment),
                TriggerOutcome::Stale => {}
            },
            AppEvent::BadgeRefreshed {
                environment,
                generation,
                url,
            } => {
                if deployer.is_current(generation)
                    && state.active_environment.as_deref() == Some(environment.as_str())
                {
                    state.set_badge_url(url);
                }
            }
            AppEvent::BadgeStatus {
                environment,
                generation,
                status,
            } => {
                if deployer.is_current(generation)
                    && state.active_environment.as_deref() == Some(environment.as_str())
                {
                    state.set_badge_status(status);
                }
            }
            AppEvent::Notice { level, message } => state.add_notification(level, message),
            AppEvent::Error(e) => state.set_error(e),
        }

        if state.should_quit {
            return Ok(());
        }
    }
}
