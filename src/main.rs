use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use vecfill::host::{Generator, fill_slice};
use vecfill::runtime::abi::ABI_NAME;
use vecfill::runtime::{ABI_VERSION, FillFn};

/// Fill a buffer through a vecfill extension and print it as JSON.
#[derive(Debug, Parser)]
#[command(name = "vecfill", version, about)]
struct Args {
    /// Extension library to load; defaults to the `fill` linked into this binary
    #[arg(long, env = "VECFILL_LIBRARY")]
    library: Option<PathBuf>,

    /// Number of elements to fill
    #[arg(long, short = 'n', default_value_t = 8)]
    count: usize,

    /// Value generator: constant:V, ramp:START,STEP or uniform:LOW,HIGH
    #[arg(long, short = 'g', default_value = "ramp:0,1")]
    generator: String,

    /// Seed for the uniform generator
    #[arg(long, env = "VECFILL_SEED", default_value_t = 0)]
    seed: u64,

    /// Pretty-print the JSON output
    #[arg(long)]
    pretty: bool,
}

fn initialize_tracing() {
    let filter =
        EnvFilter::try_from_env("VECFILL_LOG").unwrap_or_else(|_| EnvFilter::new("vecfill=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(args: &Args, fill: FillFn) -> Result<Vec<f64>> {
    let generator = Generator::parse_with_seed(&args.generator, args.seed)
        .with_context(|| format!("invalid --generator '{}'", args.generator))?;
    debug!(%generator, count = args.count, "filling buffer");

    let mut buf = vec![0.0f64; args.count];
    // SAFETY: the installed getter is valid for any number of calls and the
    // count handed to `fill` is the buffer length.
    generator.install(|get| unsafe { fill_slice(fill, &mut buf, get) });
    Ok(buf)
}

#[cfg(unix)]
fn run_with_library(args: &Args, path: &std::path::Path) -> Result<Vec<f64>> {
    let ext = vecfill::host::Extension::open(path)
        .with_context(|| format!("loading extension {}", path.display()))?;
    info!(
        path = %ext.path().display(),
        abi = ABI_NAME,
        abi_version = ext.abi_version(),
        "extension loaded"
    );
    // SAFETY: `ext` stays loaded until `run` has returned.
    run(args, unsafe { ext.fill_fn() })
}

fn run_in_process(args: &Args) -> Result<Vec<f64>> {
    info!(abi = ABI_NAME, abi_version = ABI_VERSION, "using in-process fill");
    run(args, vecfill::runtime::stubs::fill)
}

#[cfg(not(unix))]
fn run_with_library(_args: &Args, path: &std::path::Path) -> Result<Vec<f64>> {
    anyhow::bail!("loading {} is only supported on unix hosts", path.display())
}

fn main() -> Result<()> {
    initialize_tracing();
    let args = Args::parse();

    let buf = match &args.library {
        Some(path) => run_with_library(&args, path)?,
        None => run_in_process(&args)?,
    };

    let json = if args.pretty {
        serde_json::to_string_pretty(&buf)?
    } else {
        serde_json::to_string(&buf)?
    };
    println!("{}", json);
    Ok(())
}
