//! Typewriter demo - animate text in the terminal.
//!
//! ```text
//! typewriter --text "Hello" --text "World" --loop
//! typewriter --config demo.toml --start-on-visible --row 40
//! ```
//!
//! Logs go to `--log-file` (filter with `RUST_LOG`), never to the terminal
//! the animation draws on.

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, fmt};

use spark_typewriter::{Placement, TextSource, TypewriterConfig, TypewriterError, mount, run};

#[derive(Parser, Debug)]
#[command(name = "typewriter")]
#[command(about = "Typewriter text animation in the terminal", version)]
struct Cli {
    /// TOML config file (flags below override it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Sentence to type; repeat for several
    #[arg(long = "text")]
    text: Vec<String>,

    /// Cycle through the sentences forever
    #[arg(long = "loop")]
    loop_text: bool,

    /// Reveal characters in reverse order
    #[arg(long)]
    reverse: bool,

    /// Milliseconds per typed character
    #[arg(long)]
    typing_speed: Option<u64>,

    /// Milliseconds per deleted character
    #[arg(long)]
    deleting_speed: Option<u64>,

    /// Pause after typing and after deleting (ms)
    #[arg(long)]
    pause: Option<u64>,

    /// Delay before the first character (ms)
    #[arg(long)]
    initial_delay: Option<u64>,

    /// Wait until the line is scrolled into view (use Up/Down)
    #[arg(long)]
    start_on_visible: bool,

    /// Document row of the line
    #[arg(long, default_value_t = 1)]
    row: i32,

    /// Column of the line
    #[arg(long, default_value_t = 2)]
    column: u16,

    /// Write logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();
    let _guard = cli.log_file.as_deref().and_then(init_tracing);

    if let Err(e) = run_cli(cli) {
        error!(error = %e, "typewriter failed");
        eprintln!("typewriter: {e}");
        std::process::exit(1);
    }
}

fn run_cli(cli: Cli) -> Result<(), TypewriterError> {
    let mut config = match &cli.config {
        Some(path) => TypewriterConfig::load(path)?,
        None => TypewriterConfig {
            text: TextSource::Many(vec![
                "Hello from spark-typewriter.".to_string(),
                "Press q to quit.".to_string(),
            ]),
            loop_text: true,
            ..Default::default()
        },
    };

    match cli.text.len() {
        0 => {}
        1 => config.text = TextSource::Single(cli.text[0].clone()),
        _ => config.text = TextSource::Many(cli.text.clone()),
    }
    config.loop_text |= cli.loop_text;
    config.reverse_mode |= cli.reverse;
    config.start_on_visible |= cli.start_on_visible;
    if let Some(ms) = cli.typing_speed {
        config.typing_speed = ms;
    }
    if let Some(ms) = cli.deleting_speed {
        config.deleting_speed = ms;
    }
    if let Some(ms) = cli.pause {
        config.pause_duration = ms;
    }
    if let Some(ms) = cli.initial_delay {
        config.initial_delay = ms;
    }

    let mut props = config.into_props()?;
    props.on_sentence_complete = Some(std::rc::Rc::new(|sentence: &str, index: usize| {
        info!(index, sentence, "sentence complete");
    }));

    let placement = Placement { column: cli.column, row: cli.row };
    let mut handle = mount(props, placement)?;
    let result = run(&mut handle);
    handle.unmount()?;
    result
}

fn init_tracing(path: &Path) -> Option<WorkerGuard> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let file_name = path.file_name()?;
    let appender = tracing_appender::rolling::never(dir, file_name);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(fmt::layer().with_writer(writer).with_ansi(false))
        .try_init()
        .ok()?;
    Some(guard)
}
