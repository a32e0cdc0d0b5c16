mod listing;
mod repl;

use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};
use std::path::PathBuf;

use clap::Parser;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use repl::{Outcome, Repl};

/// Drives the nesium debugger bookmarks and TAS Editor models from the
/// command line.
#[derive(Parser, Debug)]
#[command(name = "nesium-devtools")]
#[command(about = "Line-oriented front end for the nesium developer tools", long_about = None)]
struct Args {
    /// Read commands from this file instead of stdin
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: Level,

    /// Rows visible in the assembly view
    #[arg(long, default_value_t = 16)]
    view_lines: usize,

    /// Stop at the first failing command
    #[arg(long)]
    strict: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(args.log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let input: Box<dyn BufRead> = match &args.script {
        Some(path) => {
            info!(path = %path.display(), "running script");
            Box::new(BufReader::new(File::open(path)?))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut repl = Repl::new(args.view_lines);
    let stdout = io::stdout();
    let mut out = stdout.lock();

    for (index, line) in input.lines().enumerate() {
        let line = line?;
        match repl.execute(&line) {
            Ok(Outcome::Output(lines)) => {
                for text in lines {
                    writeln!(out, "{text}")?;
                }
            }
            Ok(Outcome::Quit) => break,
            Err(err) if args.strict => {
                return Err(err.context(format!("line {}", index + 1)));
            }
            Err(err) => {
                warn!(line = index + 1, "{err:#}");
                writeln!(out, "error: {err:#}")?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
