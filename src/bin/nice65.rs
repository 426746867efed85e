use std::{
    error::Error,
    fs::File,
    io::{self, BufWriter, Read, Write},
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::Parser;
use nice65::{config::Config, walk, Outcome};
use tracing::Level;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Args {
    /// Input file, `-` for stdin (a directory with `--recursive`)
    infile: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long, conflicts_with_all = ["modify_in_place", "recursive"])]
    outfile: Option<PathBuf>,

    /// Use the input file as output target
    #[arg(short, long, conflicts_with = "recursive")]
    modify_in_place: bool,

    /// Recursively fix all matching files below the input directory in place
    #[arg(short, long)]
    recursive: bool,

    /// Shell-style file name pattern used with `--recursive` (default: `*.s`)
    #[arg(short, long, requires = "recursive")]
    pattern: Option<String>,

    /// Accept label definitions without a trailing colon
    #[arg(long)]
    legacy_labels: bool,

    /// Config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// One of `TRACE`, `DEBUG`, `INFO`, `WARN`, or `ERROR`
    #[arg(short, long, default_value_t = Level::INFO)]
    log_level: Level,
}

fn main() -> ExitCode {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(args.log_level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = main_real(args) {
        tracing::error!("{e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn main_real(args: Args) -> Result<(), Box<dyn Error>> {
    let config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    let mut options = config.options();
    if args.legacy_labels {
        options.colon_required = false;
    }

    if args.recursive {
        let pattern = args.pattern.as_deref().unwrap_or(&config.pattern);
        let failed = walk::fix_all(&args.infile, pattern, options)
            .map_err(|e| format!("cant walk {}: {e}", args.infile.display()))?;
        if !failed.is_empty() {
            return Err(format!("{} files failed", failed.len()).into());
        }
        return Ok(());
    }

    if args.modify_in_place {
        if is_stdio(&args.infile) {
            return Err("cant modify stdin in place".into());
        }
        return walk::fix_in_place(&args.infile, options)
            .map_err(|e| format!("{}: {e}", args.infile.display()).into());
    }

    let mut source = String::new();
    if is_stdio(&args.infile) {
        io::stdin().read_to_string(&mut source)?;
    } else {
        File::open(&args.infile)
            .map_err(|e| format!("cant open file: {e}"))?
            .read_to_string(&mut source)?;
    }

    let text = match nice65::format_source(&source, options)
        .map_err(|e| format!("{}: {e}", args.infile.display()))?
    {
        Outcome::Formatted(text) => text,
        Outcome::Ignored => {
            tracing::info!("ignoring {}", args.infile.display());
            source
        }
    };

    // only open the output once the whole file has been formatted
    let mut output: Box<dyn Write> = match args.outfile.clone() {
        Some(path) if !is_stdio(&path) => Box::new(BufWriter::new(
            File::options()
                .write(true)
                .create(true)
                .truncate(true)
                .open(path)
                .map_err(|e| format!("cant open file: {e}"))?,
        )),
        _ => Box::new(io::stdout()),
    };
    output.write_all(text.as_bytes())?;
    output.flush()?;
    Ok(())
}
