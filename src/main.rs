// Barebones: a stepping interpreter with a terminal debugger

use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use clap::Parser as ClapParser;
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use barebones::interpreter::{Interpreter, Observer, Output, OutputKind};
use barebones::parser;
use barebones::ui::App;

#[derive(ClapParser, Debug)]
#[command(name = "barebones", version, about = "Step through Barebones programs")]
struct Cli {
    /// Barebones source file
    file: PathBuf,

    /// Run to completion without the debugger and print the results
    #[arg(long)]
    run: bool,

    /// Number of steps kept for stepping backwards
    #[arg(long, default_value_t = 10_000)]
    history: usize,

    /// Write log output to this file (the debugger owns the terminal)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

/// Prints every output line as it is emitted
struct ConsoleObserver;

impl Observer for ConsoleObserver {
    fn on_output(&mut self, output: &Output) {
        match output.kind {
            OutputKind::Info => println!("{}", output),
            OutputKind::Warning | OutputKind::Error => eprintln!("{}", output),
        }
    }
}

fn filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("barebones=info"))
}

fn init_logging(cli: &Cli) -> io::Result<()> {
    if let Some(path) = &cli.log_file {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if cli.run {
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_target(false)
            .with_writer(io::stderr)
            .init();
    }
    Ok(())
}

fn run_headless(interpreter: &mut Interpreter) -> bool {
    let result = interpreter.run();
    println!("{}", interpreter.memory_dump());
    println!("{}", interpreter.elapsed_report());
    match result {
        Ok(()) => true,
        Err(e) => {
            error!("run failed: {}", e);
            false
        }
    }
}

fn run_debugger(interpreter: Interpreter, source: String) -> io::Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(interpreter, source);
    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    res
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli)?;

    let source = match fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("Error: cannot read '{}': {}", cli.file.display(), e);
            std::process::exit(1);
        }
    };

    let program = match parser::load(&source) {
        Ok(program) => program,
        Err(e) => {
            let mut console = ConsoleObserver;
            for output in e.outputs() {
                console.on_output(&output);
            }
            std::process::exit(1);
        }
    };
    info!(
        "loaded {} with {} instruction(s)",
        cli.file.display(),
        program.len()
    );

    let mut interpreter = Interpreter::new(program).with_history(cli.history);

    if cli.run {
        interpreter.add_observer(Box::new(ConsoleObserver));
        if !run_headless(&mut interpreter) {
            std::process::exit(1);
        }
        return Ok(());
    }

    if let Err(err) = run_debugger(interpreter, source) {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
