use std::error::Error as StdError;
use std::fmt;
use std::io;

use ndarray::ShapeError;

/// The error type for dataset put/get operations.
pub enum Error {
    /// An error occurred in the HDF5 library.
    Hdf5(hdf5::Error),
    /// An I/O error occurred outside of HDF5 (e.g., while preparing subfile directories).
    Io(io::Error),
    /// A usage or layout error (e.g., invalid arguments, inconsistent stored metadata).
    Internal(String),
}

/// A type for results generated by this crate.
pub type Result<T, E = Error> = ::std::result::Result<T, E>;

impl From<&str> for Error {
    fn from(desc: &str) -> Self {
        Self::Internal(desc.into())
    }
}

impl From<String> for Error {
    fn from(desc: String) -> Self {
        Self::Internal(desc)
    }
}

impl From<hdf5::Error> for Error {
    fn from(err: hdf5::Error) -> Self {
        Self::Hdf5(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<ShapeError> for Error {
    fn from(err: ShapeError) -> Self {
        format!("shape error: {}", err).into()
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Hdf5(ref err) => write!(f, "HDF5 error: {:?}", err),
            Self::Io(ref err) => write!(f, "I/O error: {:?}", err),
            Self::Internal(ref desc) => f.write_str(desc),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Self::Hdf5(ref err) => write!(f, "HDF5 error: {}", err),
            Self::Io(ref err) => write!(f, "I/O error: {}", err),
            Self::Internal(ref desc) => f.write_str(desc),
        }
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match *self {
            Self::Hdf5(ref err) => Some(err),
            Self::Io(ref err) => Some(err),
            Self::Internal(_) => None,
        }
    }
}
