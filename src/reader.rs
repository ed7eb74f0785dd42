//! Reading side of a stream.
//!
//! Readers walk the published steps in order. On every step the datasets are redistributed
//! over the reading ranks with [`partition`], independently of how many ranks wrote them, and
//! each dataset is read through the write block of the writer that produced it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use hdf5::file::OpenMode;
use hdf5::{File, Group};
use log::debug;
use ndarray::{Array1, ArrayView1};

use crate::comm::Comm;
use crate::element::{Element, ElementKind};
use crate::error::{Error, Result};
use crate::method::Method;
use crate::naming::{
    self, array_path, parse_step, step_group, DATA, NUMBER_OF_ELEMENTS, N_DATASETS_PER_WRITER,
    N_WRITERS, PRIMARY_ARRAY, SUBFILED_ATTR,
};
use crate::partition::{partition, writer_of, Assignment};
use crate::storage::{open_file, read_count};

/// Values per line in an array dump.
const VALUES_PER_LINE: usize = 32;

/// Reads back a stream written by [`Writer`](crate::Writer).
pub struct Reader<'c, C: Comm> {
    comm: &'c C,
    path: PathBuf,
    method: Method,
    file: File,
    subfiled: bool,
    subfiles: HashMap<usize, File>,
    steps: Vec<usize>,
    cursor: usize,
}

impl<'c, C: Comm> Reader<'c, C> {
    /// Opens the stream at `path` and lists its published steps.
    ///
    /// With [`Method::Mpi`] the index or shared file is opened collectively. The way the
    /// datasets are laid out is the one recorded by the writer.
    pub fn open<P: AsRef<Path>>(comm: &'c C, path: P, method: Method) -> Result<Self> {
        method.check_available()?;
        let path = path.as_ref().to_path_buf();
        let file = open_file(comm, &path, OpenMode::Read, method == Method::Mpi)?;
        let subfiled = file
            .attr(SUBFILED_ATTR)
            .and_then(|attr| attr.read_scalar::<bool>())
            .map_err(|err| {
                Error::from(format!("{} is not a put/get stream: {}", path.display(), err))
            })?;

        let mut steps: Vec<usize> =
            file.member_names()?.iter().filter_map(|name| parse_step(name)).collect();
        steps.sort_unstable();

        debug!(
            "opened {} ({} layout): {} steps",
            path.display(),
            if subfiled { "subfiled" } else { "shared" },
            steps.len()
        );
        Ok(Self { comm, path, method, file, subfiled, subfiles: HashMap::new(), steps, cursor: 0 })
    }

    pub fn comm(&self) -> &C {
        self.comm
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// Whether every writer stored its datasets in a separate subfile.
    pub fn is_subfiled(&self) -> bool {
        self.subfiled
    }

    /// Indices of all published steps, in ascending order.
    pub fn steps(&self) -> &[usize] {
        &self.steps
    }

    /// Advances to the next published step, or returns `None` at the end of the stream.
    pub fn next_step(&mut self) -> Result<Option<StepReader<'_, 'c, C>>> {
        let step = match self.steps.get(self.cursor) {
            Some(&step) => step,
            None => return Ok(None),
        };
        self.cursor += 1;
        self.step(step).map(Some)
    }

    /// Opens a published step by its index.
    pub fn step(&mut self, step: usize) -> Result<StepReader<'_, 'c, C>> {
        ensure!(
            self.steps.binary_search(&step).is_ok(),
            "step {} has not been published in {}",
            step,
            self.path.display()
        );
        let group = self.file.group(&step_group(step))?;
        let n_datasets_per_writer = read_count(&group, N_DATASETS_PER_WRITER)?;
        let n_writers = read_count(&group, N_WRITERS)?;
        debug!(
            "step {}: {} writers with {} datasets each",
            step, n_writers, n_datasets_per_writer
        );
        Ok(StepReader { reader: self, step, group, n_datasets_per_writer, n_writers })
    }

    fn subfile(&mut self, writer_id: usize) -> Result<&File> {
        if !self.subfiles.contains_key(&writer_id) {
            let path = naming::subfile_path(&self.path, writer_id);
            let file = open_file(self.comm, &path, OpenMode::Read, false)?;
            self.subfiles.insert(writer_id, file);
        }
        Ok(&self.subfiles[&writer_id])
    }
}

/// A published step opened for reading.
pub struct StepReader<'r, 'c, C: Comm> {
    reader: &'r mut Reader<'c, C>,
    step: usize,
    group: Group,
    n_datasets_per_writer: usize,
    n_writers: usize,
}

impl<'r, 'c, C: Comm> StepReader<'r, 'c, C> {
    /// Index of the step, starting from 0.
    pub fn index(&self) -> usize {
        self.step
    }

    pub fn n_datasets_per_writer(&self) -> usize {
        self.n_datasets_per_writer
    }

    pub fn n_writers(&self) -> usize {
        self.n_writers
    }

    pub fn n_datasets(&self) -> usize {
        self.n_writers * self.n_datasets_per_writer
    }

    /// The datasets this rank reads on this step.
    pub fn assignment(&self) -> Result<Assignment> {
        let comm = self.reader.comm;
        partition(self.n_datasets(), comm.size(), comm.rank())
    }

    fn array_group(
        &mut self, writer_id: usize, dataset_id: usize, array_id: usize,
    ) -> Result<Group> {
        ensure!(
            dataset_id < self.n_datasets(),
            "step {} has no dataset {}",
            self.step,
            dataset_id
        );
        ensure!(
            writer_of(dataset_id, self.n_datasets_per_writer)? == writer_id,
            "dataset {} is not in the write block of writer {}",
            dataset_id,
            writer_id
        );
        let path = array_path(dataset_id, array_id);
        if self.reader.subfiled {
            let path = format!("{}/{}", step_group(self.step), path);
            Ok(self.reader.subfile(writer_id)?.group(&path)?)
        } else {
            Ok(self.group.group(&path)?)
        }
    }

    /// Element type of an array, as stored by its writer.
    pub fn element_kind(
        &mut self, writer_id: usize, dataset_id: usize, array_id: usize,
    ) -> Result<ElementKind> {
        let group = self.array_group(writer_id, dataset_id, array_id)?;
        let desc = group.dataset(DATA)?.dtype()?.to_descriptor()?;
        ElementKind::from_descriptor(&desc).ok_or_else(|| {
            format!("unsupported element type {} in {}", desc, group.name()).into()
        })
    }

    /// Reads an array through the write block of `writer_id`.
    pub fn read_array<T: Element>(
        &mut self, writer_id: usize, dataset_id: usize, array_id: usize,
    ) -> Result<Array1<T>> {
        let group = self.array_group(writer_id, dataset_id, array_id)?;
        let n_elem = group.dataset(NUMBER_OF_ELEMENTS)?.read_scalar::<u32>()? as usize;
        let data = group.dataset(DATA)?.read_1d::<T>()?;
        ensure!(
            data.len() == n_elem,
            "{} holds {} elements, but its element count is {}",
            group.name(),
            data.len(),
            n_elem
        );
        Ok(data)
    }

    /// Reads every dataset assigned to this rank and returns their dumps.
    pub fn dump_local(&mut self) -> Result<String> {
        let rank = self.reader.comm.rank();
        let assignment = self.assignment()?;
        if assignment.is_empty() {
            return Ok(format!("{} has nothing to read\n", rank));
        }
        let mut out = String::new();
        for dataset_id in assignment.ids() {
            let writer_id = writer_of(dataset_id, self.n_datasets_per_writer)?;
            let kind = self.element_kind(writer_id, dataset_id, PRIMARY_ARRAY)?;
            out.push_str(&dispatch_element!(kind, dump_array(&mut *self, writer_id, dataset_id))?);
        }
        Ok(out)
    }
}

fn dump_array<T: Element>(
    step: &mut StepReader<'_, '_, impl Comm>, writer_id: usize, dataset_id: usize,
) -> Result<String> {
    let data = step.read_array::<T>(writer_id, dataset_id, PRIMARY_ARRAY)?;
    Ok(format_array(step.reader.comm.rank(), dataset_id, PRIMARY_ARRAY, data.view()))
}

/// Formats an array the way `get` prints it.
///
/// The first line names the rank, the array, its length and its element type; it is followed
/// by the values, separated by commas, with at most 32 values per line.
pub fn format_array<T: Element>(
    rank: usize, dataset_id: usize, array_id: usize, data: ArrayView1<T>,
) -> String {
    let mut out = format!(
        "{} {} {} {}\n",
        rank,
        array_path(dataset_id, array_id),
        data.len(),
        T::type_name()
    );
    for (i, value) in data.iter().enumerate() {
        if i > 0 {
            out.push_str(if i % VALUES_PER_LINE == 0 { "\n" } else { ", " });
        }
        out.push_str(&value.format_value());
    }
    out.push('\n');
    out
}
