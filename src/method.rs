use std::fmt::{self, Display};
use std::str::FromStr;

use crate::error::{Error, Result};

/// How ranks share a stream on disk.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// Every writer rank owns a subfile; rank 0 keeps an index of the published steps.
    Posix,
    /// A single shared file accessed collectively through the MPI-IO driver.
    Mpi,
}

impl Method {
    pub fn name(self) -> &'static str {
        match self {
            Self::Posix => "POSIX",
            Self::Mpi => "MPI",
        }
    }

    /// Whether the stream is stored as one subfile per writer.
    pub fn is_subfiled(self) -> bool {
        self == Self::Posix
    }

    /// Whether this method can be used by the current build.
    pub fn is_available(self) -> bool {
        match self {
            Self::Posix => true,
            Self::Mpi => cfg!(feature = "mpio"),
        }
    }

    pub(crate) fn check_available(self) -> Result<()> {
        ensure!(
            self.is_available(),
            "method {} requires the mpio feature (rebuild with `--features mpio`)",
            self
        );
        Ok(())
    }
}

impl Default for Method {
    fn default() -> Self {
        Self::Posix
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "POSIX" | "BP" => Ok(Self::Posix),
            "MPI" | "MPIIO" | "MPI_AGGREGATE" => Ok(Self::Mpi),
            _ => Err(format!(
                "unknown method {:?} (expected one of: POSIX, BP, MPI, MPIIO, MPI_AGGREGATE)",
                s
            )
            .into()),
        }
    }
}
