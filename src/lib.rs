//! Parallel put/get of per-rank datasets.
//!
//! This crate pairs a writer and a reader for streams of numeric datasets produced by a set of
//! ranks over a number of timesteps:
//!
//! - Every writer rank owns a fixed block of datasets and writes them on every step.
//! - Readers re-open the stream and redistribute the datasets over their own ranks, whose
//!   number does not have to match the number of writers.
//! - Storage is delegated to `HDF5`; with the `mpio` feature ranks are MPI processes and
//!   streams can be shared files accessed through the MPI-IO driver.
//!
//! The `put` and `get` binaries drive [`Writer`] and [`Reader`] from the command line.

#![cfg_attr(feature = "cargo-clippy", warn(clippy::all))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::module_name_repetitions))]
#![cfg_attr(feature = "cargo-clippy", allow(clippy::cast_possible_truncation))]

#[macro_use]
mod macros;

mod comm;
mod element;
mod error;
mod layout;
mod method;
mod partition;
mod reader;
mod storage;
mod writer;

pub mod logging;
pub mod naming;


pub use crate::comm::{Comm, LocalComm};
pub use crate::element::{initialize_array, Element, ElementKind};
pub use crate::error::{Error, Result};
pub use crate::layout::Layout;
pub use crate::method::Method;
pub use crate::partition::{partition, writer_dataset_id, writer_of, Assignment};
pub use crate::reader::{format_array, Reader, StepReader};
pub use crate::writer::{StepWriter, Writer};

/// Returns the version of the HDF5 library that the crate was compiled against.
pub fn hdf5_version() -> (u8, u8, u8) {
    hdf5::library_version()
}

#[cfg(test)]
pub mod tests {
    use super::hdf5_version;

    #[test]
    pub fn test_hdf5_version() {
        assert!(hdf5_version() >= (1, 8, 4));
    }
}
