//! Reads back the datasets written by `put`, redistributing them over the reading ranks.
use std::path::PathBuf;
use std::process;

use anyhow::Result;
use clap::Parser;
use log::{debug, error};

use putget::{logging, Comm, Method, Reader};

#[derive(Parser, Debug)]
#[command(name = "get", version, about = "Read back the datasets written by put")]
struct Cli {
    /// File to read
    file: PathBuf,
    /// Transport method: POSIX (or BP) for independent access, MPI for collective access
    method: Method,
    /// Log debug messages
    #[arg(short, long)]
    verbose: bool,
}

fn run(comm: &impl Comm, cli: &Cli) -> putget::Result<()> {
    let mut reader = Reader::open(comm, &cli.file, cli.method)?;
    while let Some(mut step) = reader.next_step()? {
        eprint!("{}", step.dump_local()?);
        debug!("get finished step {}", step.index());
    }
    Ok(())
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
