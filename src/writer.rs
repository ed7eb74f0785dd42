//! Writing side of a stream.
//!
//! A [`Writer`] plays the role of a declared I/O group: it knows the layout of every step and
//! how ranks share the output. Each step is opened with [`Writer::begin_step`], which defines
//! all variables of the step, filled through [`StepWriter`] and published by
//! [`StepWriter::close`].

use std::convert::TryFrom;
use std::fs;
use std::marker::PhantomData;
use std::ops::Range;
use std::path::{Path, PathBuf};

use hdf5::file::OpenMode;
use hdf5::{File, Group};
use log::{debug, info, warn};
use ndarray::ArrayView1;

use crate::comm::Comm;
use crate::element::{initialize_array, Element};
use crate::error::Result;
use crate::layout::Layout;
use crate::method::Method;
use crate::naming::{
    self, array_path, data_path, elements_path, step_group, DATA, NUMBER_OF_ELEMENTS,
    N_DATASETS_PER_WRITER, N_WRITERS, PRIMARY_ARRAY, SUBFILED_ATTR,
};
use crate::partition::{writer_dataset_id, writer_of};
use crate::storage::{create_scalar, ensure_group, open_file};

/// Writes the datasets owned by one rank, step after step.
pub struct Writer<'c, C: Comm, T: Element> {
    comm: &'c C,
    path: PathBuf,
    method: Method,
    layout: Layout,
    n_writers: i32,
    n_datasets_per_writer: i32,
    n_steps: usize,
    _elem: PhantomData<T>,
}

impl<'c, C: Comm, T: Element> Writer<'c, C, T> {
    /// Declares the stream at `path`; nothing is written until the first step is begun.
    pub fn create<P: AsRef<Path>>(
        comm: &'c C, path: P, method: Method, layout: Layout,
    ) -> Result<Self> {
        method.check_available()?;
        layout.validate()?;
        ensure!(
            layout.kind == T::KIND,
            "layout holds {} elements, but the writer stores {}",
            layout.kind,
            T::type_name()
        );
        let n_writers = i32::try_from(comm.size()).map_err(|_| {
            format!("{} writers do not fit into a signed 32-bit count", comm.size())
        })?;
        let n_datasets_per_writer = i32::try_from(layout.n_datasets_per_writer).map_err(|_| {
            format!("too many datasets per writer: {}", layout.n_datasets_per_writer)
        })?;

        let path = path.as_ref().to_path_buf();
        if method.is_subfiled() {
            fs::create_dir_all(naming::subfile_dir(&path))?;
        }
        debug!(
            "declared {} for {} writers: {} datasets of {} {} per writer, {} bytes per step",
            path.display(),
            n_writers,
            n_datasets_per_writer,
            layout.n_elem,
            T::type_name(),
            layout.buffer_size()
        );

        Ok(Self {
            comm,
            path,
            method,
            layout,
            n_writers,
            n_datasets_per_writer,
            n_steps: 0,
            _elem: PhantomData,
        })
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

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn steps_written(&self) -> usize {
        self.n_steps
    }

    /// Global ids of the datasets written by this rank.
    pub fn owned_datasets(&self) -> Range<usize> {
        let n_per = self.layout.n_datasets_per_writer;
        let start = writer_dataset_id(self.comm.rank(), n_per, 0);
        start..start + n_per
    }

    /// Opens the next step and defines its variables.
    ///
    /// The first step truncates any existing output; later steps are appended. With
    /// [`Method::Mpi`] this is a collective call.
    pub fn begin_step(&mut self) -> Result<StepWriter<'_, 'c, C, T>> {
        let step = self.n_steps;
        let mode = if step == 0 { OpenMode::Create } else { OpenMode::Append };
        let file = match self.method {
            Method::Posix => {
                let path = naming::subfile_path(&self.path, self.comm.rank());
                open_file(self.comm, &path, mode, false)?
            }
            Method::Mpi => {
                let file = open_file(self.comm, &self.path, mode, true)?;
                if step == 0 {
                    record_layout(&file, false)?;
                }
                file
            }
        };

        let group = file.create_group(&step_group(step))?;
        create_scalar::<i32>(&group, N_DATASETS_PER_WRITER, None)?;
        create_scalar::<i32>(&group, N_WRITERS, None)?;

        // In a shared file every rank has to take part in defining every variable.
        let writers = match self.method {
            Method::Posix => self.comm.rank()..self.comm.rank() + 1,
            Method::Mpi => 0..self.comm.size(),
        };
        for writer in writers {
            for i in 0..self.layout.n_datasets_per_writer {
                let dataset_id = writer_dataset_id(writer, self.layout.n_datasets_per_writer, i);
                self.define_array(&group, dataset_id, PRIMARY_ARRAY)?;
            }
        }

        debug!("began step {} of {}", step, self.path.display());
        let written = vec![false; self.layout.n_datasets_per_writer];
        Ok(StepWriter { writer: self, step, file, group, metadata_written: false, written })
    }

    fn define_array(&self, step: &Group, dataset_id: usize, array_id: usize) -> Result<()> {
        let group = ensure_group(step, &array_path(dataset_id, array_id))?;
        create_scalar::<u32>(&group, NUMBER_OF_ELEMENTS, None)?;
        group.new_dataset::<T>().shape(self.layout.n_elem).create(DATA)?;
        Ok(())
    }

    /// Writes one complete step: the metadata and the initial values of every owned dataset.
    pub fn put_step(&mut self) -> Result<()> {
        let rank = self.comm.rank();
        let n_elem = self.layout.n_elem;
        let owned = self.owned_datasets();
        let mut step = self.begin_step()?;
        step.write_metadata()?;
        for dataset_id in owned {
            let data = initialize_array::<T>(rank, n_elem);
            step.write_array(dataset_id, PRIMARY_ARRAY, &data)?;
        }
        step.close()
    }

    fn publish_step(&self, step: usize) -> Result<()> {
        let mode = if step == 0 { OpenMode::Create } else { OpenMode::Append };
        let index = open_file(self.comm, &self.path, mode, false)?;
        if step == 0 {
            record_layout(&index, true)?;
        }
        let group = index.create_group(&step_group(step))?;
        create_scalar(&group, N_DATASETS_PER_WRITER, Some(&self.n_datasets_per_writer))?;
        create_scalar(&group, N_WRITERS, Some(&self.n_writers))?;
        Ok(())
    }
}

fn record_layout(file: &File, subfiled: bool) -> Result<()> {
    file.new_attr::<bool>().shape(()).create(SUBFILED_ATTR)?.write_scalar(&subfiled)?;
    Ok(())
}

/// A step of a [`Writer`] that is open for writing.
pub struct StepWriter<'w, 'c, C: Comm, T: Element> {
    writer: &'w mut Writer<'c, C, T>,
    step: usize,
    file: File,
    group: Group,
    metadata_written: bool,
    written: Vec<bool>,
}

impl<'w, 'c, C: Comm, T: Element> StepWriter<'w, 'c, C, T> {
    /// Index of the step, starting from 0.
    pub fn index(&self) -> usize {
        self.step
    }

    /// Writes `n_datasets_per_writer` and `n_writers` for this step.
    pub fn write_metadata(&mut self) -> Result<()> {
        let shared = self.writer.method == Method::Mpi;
        if !shared || self.writer.comm.rank() == 0 {
            let group = &self.group;
            let (n_per, n_writers) = (self.writer.n_datasets_per_writer, self.writer.n_writers);
            group.dataset(N_DATASETS_PER_WRITER)?.write_scalar(&n_per)?;
            group.dataset(N_WRITERS)?.write_scalar(&n_writers)?;
        }
        self.metadata_written = true;
        Ok(())
    }

    /// Writes the element count and the data of an array owned by this rank.
    pub fn write_array<'a, A>(&mut self, dataset_id: usize, array_id: usize, data: A) -> Result<()>
    where
        A: Into<ArrayView1<'a, T>>,
    {
        let data = data.into();
        let layout = self.writer.layout;
        let rank = self.writer.comm.rank();
        ensure!(
            layout.n_datasets_per_writer > 0
                && writer_of(dataset_id, layout.n_datasets_per_writer)? == rank,
            "dataset {} is not owned by writer {}",
            dataset_id,
            rank
        );
        ensure!(
            array_id == PRIMARY_ARRAY,
            "array {} of dataset {} is not defined",
            array_id,
            dataset_id
        );
        ensure!(
            data.len() == layout.n_elem,
            "array of dataset {} has {} elements, expected {}",
            dataset_id,
            data.len(),
            layout.n_elem
        );

        let n_elem = layout.n_elem as u32;
        self.group.dataset(&elements_path(dataset_id, array_id))?.write_scalar(&n_elem)?;
        self.group.dataset(&data_path(dataset_id, array_id))?.write_raw(data)?;

        self.written[dataset_id - writer_dataset_id(rank, layout.n_datasets_per_writer, 0)] = true;
        Ok(())
    }

    /// Closes the step and makes it visible to readers.
    ///
    /// Every rank has to close the step before any of them begins the next one.
    pub fn close(mut self) -> Result<()> {
        if !self.metadata_written {
            self.write_metadata()?;
        }
        let Self { writer, step, file, group, written, .. } = self;
        for (i, done) in written.iter().enumerate() {
            if !done {
                let dataset_id = writer_dataset_id(
                    writer.comm.rank(),
                    writer.layout.n_datasets_per_writer,
                    i,
                );
                warn!("step {}: dataset {} was defined but never written", step, dataset_id);
            }
        }
        drop(group);
        file.flush()?;
        drop(file);

        writer.comm.barrier();
        if writer.method.is_subfiled() && writer.comm.rank() == 0 {
            writer.publish_step(step)?;
        }
        writer.comm.barrier();

        writer.n_steps += 1;
        info!("put finished step {}", step);
        Ok(())
    }
}
