//! Communicators that ranks use to coordinate a stream.

use cfg_if::cfg_if;

/// The subset of an MPI communicator that writers and readers rely on.
pub trait Comm {
    fn rank(&self) -> usize;

    fn size(&self) -> usize;

    /// Blocks until every rank of the communicator has reached the barrier.
    fn barrier(&self);

    /// Raw MPI communicator handle, if the communicator is backed by MPI.
    #[cfg(feature = "mpio")]
    fn raw(&self) -> Option<mpi::ffi::MPI_Comm>;
}

/// A communicator that is not backed by MPI.
///
/// Used when the crate is built without `mpio`. Several ranks of the same communicator can
/// be played one after another in a single process, which makes the barrier a no-op.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LocalComm {
    rank: usize,
    size: usize,
}

impl LocalComm {
    /// Rank `rank` of a communicator with `size` ranks.
    ///
    /// # Panics
    ///
    /// Panics if `rank` is not smaller than `size`.
    pub fn new(rank: usize, size: usize) -> Self {
        assert!(rank < size, "rank {} is out of range for {} ranks", rank, size);
        Self { rank, size }
    }

    /// The only rank of a single-process communicator.
    pub fn world() -> Self {
        Self::new(0, 1)
    }

    /// All the ranks of a communicator with `size` ranks, in rank order.
    pub fn ranks(size: usize) -> impl Iterator<Item = Self> {
        (0..size).map(move |rank| Self::new(rank, size))
    }
}

impl Comm for LocalComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn barrier(&self) {}

    #[cfg(feature = "mpio")]
    fn raw(&self) -> Option<mpi::ffi::MPI_Comm> {
        None
    }
}

cfg_if! {
    if #[cfg(feature = "mpio")] {
        use mpi::collective::CommunicatorCollectives;
        use mpi::raw::AsRaw;
        use mpi::topology::{Communicator, SystemCommunicator};

        impl Comm for SystemCommunicator {
            fn rank(&self) -> usize {
                Communicator::rank(self) as usize
            }

            fn size(&self) -> usize {
                Communicator::size(self) as usize
            }

            fn barrier(&self) {
                CommunicatorCollectives::barrier(self)
            }

            fn raw(&self) -> Option<mpi::ffi::MPI_Comm> {
                Some(self.as_raw())
            }
        }
    }
}
