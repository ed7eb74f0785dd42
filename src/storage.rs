//! Thin helpers over the HDF5 file/group API shared by writers and readers.

use std::convert::TryFrom;
use std::path::Path;

use hdf5::file::OpenMode;
use hdf5::{Dataset, File, Group, H5Type};
use log::debug;

use crate::comm::Comm;
use crate::error::Result;

/// Opens `path` in `mode`, either independently or collectively on all ranks of `comm`.
pub(crate) fn open_file<C: Comm>(
    comm: &C, path: &Path, mode: OpenMode, collective: bool,
) -> Result<File> {
    debug!(
        "opening {} ({:?}, {})",
        path.display(),
        mode,
        if collective { "collective" } else { "independent" }
    );
    if !collective {
        return Ok(File::open_as(path, mode)?);
    }
    open_collective(comm, path, mode)
}

#[cfg(feature = "mpio")]
fn open_collective<C: Comm>(comm: &C, path: &Path, mode: OpenMode) -> Result<File> {
    let raw = comm.raw().ok_or_else(|| {
        format!("collective access to {} requires an MPI communicator", path.display())
    })?;
    Ok(hdf5::FileBuilder::new().with_fapl(|p| p.mpio(raw, None)).open_as(path, mode)?)
}

#[cfg(not(feature = "mpio"))]
fn open_collective<C: Comm>(_comm: &C, path: &Path, _mode: OpenMode) -> Result<File> {
    fail!("collective access to {} requires the mpio feature", path.display());
}

/// Opens the group at `path` below `parent`, creating missing groups on the way.
pub(crate) fn ensure_group(parent: &Group, path: &str) -> Result<Group> {
    let mut group = parent.clone();
    for name in path.split('/').filter(|name| !name.is_empty()) {
        group = if group.link_exists(name) {
            group.group(name)?
        } else {
            group.create_group(name)?
        };
    }
    Ok(group)
}

/// Creates a scalar dataset and, if `value` is given, stores it.
pub(crate) fn create_scalar<T: H5Type>(
    group: &Group, name: &str, value: Option<&T>,
) -> Result<Dataset> {
    let ds = group.new_dataset::<T>().shape(()).create(name)?;
    if let Some(value) = value {
        ds.write_scalar(value)?;
    }
    Ok(ds)
}

/// Reads a non-negative signed 32-bit count.
pub(crate) fn read_count(group: &Group, name: &str) -> Result<usize> {
    let value = group.dataset(name)?.read_scalar::<i32>()?;
    usize::try_from(value)
        .map_err(|_| format!("{} in {} is negative: {}", name, group.name(), value).into())
}
