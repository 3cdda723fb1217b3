use chrono::Utc;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::ExecutableCommand;
use demo_walkthrough::api::ApiClient;
use demo_walkthrough::config::{self, CliCommand, DemoConfig};
use demo_walkthrough::gate::Variant;
use demo_walkthrough::utils::logging;
use demo_walkthrough::{ui, App, ProgressionStore};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

fn main() -> io::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    let mut cfg = DemoConfig::load();
    cfg.apply_env(|key| std::env::var(key).ok());
    let command = match cfg.apply_args(&args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            eprintln!("Run 'demo-walkthrough --help' for usage.");
            std::process::exit(1);
        }
    };

    match command {
        CliCommand::Version => {
            println!("demo-walkthrough {}", env!("CARGO_PKG_VERSION"));
            return Ok(());
        }
        CliCommand::Help => {
            print!("{}", config::usage());
            return Ok(());
        }
        CliCommand::ListVariants => {
            for id in Variant::builtin_ids() {
                if let Ok(variant) = Variant::by_id(id, &[]) {
                    println!("  {:<12} {}", id, variant.name());
                }
            }
            match cfg.extra_variants() {
                Ok(extra) => {
                    for spec in extra {
                        println!("  {:<12} {} (custom)", spec.id, spec.name);
                    }
                }
                Err(e) => eprintln!("Warning: {}", e),
            }
            return Ok(());
        }
        CliCommand::Run => {}
    }

    if let Err(e) = logging::init() {
        eprintln!("Warning: logging disabled: {}", e);
    }

    let variant = match cfg.resolve_variant() {
        Ok(variant) => variant,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };
    info!(variant = variant.id(), api = %cfg.api_base_url, "starting demo");

    let mut store = ProgressionStore::new(variant);
    if let Some(name) = &cfg.learner_name {
        store.set_learner_name(name);
    }
    let client = ApiClient::new(&cfg.api_base_url, cfg.timeout());

    let started = Instant::now();
    let now_ms = || started.elapsed().as_millis() as u64;
    let mut app = App::new(store, Arc::new(client), cfg.reveal_interval_ms, now_ms());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app, &now_ms);

    // Cleanup terminal
    disable_raw_mode()?;
    terminal.backend_mut().execute(LeaveAlternateScreen)?;

    let state = app.store.state();
    info!(
        session = %state.session_id,
        interactions = state.interactions.len(),
        ended_at = %Utc::now(),
        "demo closed"
    );
    result
}

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    now_ms: &dyn Fn() -> u64,
) -> io::Result<()> {
    loop {
        let now = now_ms();
        app.tick(now);
        terminal.draw(|frame| ui::draw(frame, &app.store, &app.screens, now))?;

        // Poll for input (50ms non-blocking)
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_key(key, now_ms());
                }
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}
