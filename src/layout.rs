use std::convert::TryFrom;
use std::mem;

use crate::element::ElementKind;
use crate::error::Result;

/// What a single writer emits on every step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Number of elements in each array.
    pub n_elem: usize,
    /// Number of datasets owned by each writer.
    pub n_datasets_per_writer: usize,
    /// Element type of the arrays.
    pub kind: ElementKind,
}

impl Layout {
    pub fn new(n_elem: usize, n_datasets_per_writer: usize, kind: ElementKind) -> Result<Self> {
        let layout = Self { n_elem, n_datasets_per_writer, kind };
        layout.validate()?;
        Ok(layout)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        ensure!(
            u32::try_from(self.n_elem).is_ok(),
            "array length {} does not fit into an unsigned 32-bit element count",
            self.n_elem
        );
        ensure!(
            i32::try_from(self.n_datasets_per_writer).is_ok(),
            "{} datasets per writer do not fit into a signed 32-bit count",
            self.n_datasets_per_writer
        );
        Ok(())
    }

    /// Bytes one writer produces per step: the two metadata scalars, then the element count
    /// and the data of every array.
    pub fn buffer_size(&self) -> usize {
        let per_array = mem::size_of::<u32>() + self.n_elem * self.kind.size();
        2 * mem::size_of::<i32>() + self.n_datasets_per_writer * per_array
    }

    /// Total number of datasets in a step written by `n_writers` ranks.
    pub fn n_datasets(&self, n_writers: usize) -> usize {
        self.n_datasets_per_writer * n_writers
    }
}
