//! Writes per-rank datasets over a number of timesteps.
//!
//! Run it under MPI when built with the `mpio` feature:
//! ``` ignore
//! cargo build --bin put --features mpio
//! mpirun -np 4 ./target/debug/put out.h5 MPI 64 2 3
//! ```
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use log::error;

use putget::{dispatch_element, logging, Comm, Element, ElementKind, Layout, Method, Writer};

#[derive(Parser, Debug)]
#[command(name = "put", version, about = "Write per-rank datasets over a number of timesteps")]
struct Cli {
    /// File to write
    file: PathBuf,
    /// Transport method: POSIX (or BP) for per-rank subfiles, MPI for a single shared file
    method: Method,
    /// Number of elements in every array
    array_len: usize,
    /// Number of datasets written by every rank
    n_datasets_per_writer: usize,
    /// Number of timesteps
    n_steps: usize,
    /// Element type of the arrays (double, float, int, ...)
    #[arg(long = "type", default_value = "double")]
    kind: ElementKind,
    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn put<T: Element>(comm: &impl Comm, cli: &Cli, layout: Layout) -> putget::Result<()> {
    let mut writer = Writer::<_, T>::create(comm, &cli.file, cli.method, layout)?;
    for _ in 0..cli.n_steps {
        writer.put_step()?;
    }
    Ok(())
}

fn run(comm: &impl Comm, cli: &Cli) -> putget::Result<()> {
    let layout = Layout::new(cli.array_len, cli.n_datasets_per_writer, cli.kind)?;
    dispatch_element!(cli.kind, put(comm, cli, layout))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "mpio")]
    let universe =
        mpi::initialize().ok_or_else(|| anyhow::anyhow!("MPI is already initialized"))?;
    #[cfg(feature = "mpio")]
    let world = universe.world();
    #[cfg(not(feature = "mpio"))]
    let world = putget::LocalComm::world();
    logging::init(world.rank(), cli.verbose);

    if let Err(err) = run(&world, &cli) {
        error!("{}", err);
        process::exit(1);
    }
    Ok(())
}
