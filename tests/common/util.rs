#![allow(dead_code)]

use std::path::{Path, PathBuf};

use putget::{Element, Layout, LocalComm, Method, Writer};

pub fn with_tmp_dir<F: FnOnce(PathBuf)>(func: F) {
    let dir = tempfile::Builder::new().prefix("tmp").tempdir_in(".").unwrap();
    func(dir.path().to_path_buf());
}

pub fn with_tmp_path<F: FnOnce(PathBuf)>(func: F) {
    with_tmp_dir(|dir| func(dir.join("stream.h5")))
}

/// Writes `n_steps` steps from `n_writers` ranks, played one after another.
pub fn put_stream<T: Element>(path: &Path, n_writers: usize, layout: Layout, n_steps: usize) {
    let comms: Vec<_> = LocalComm::ranks(n_writers).collect();
    let mut writers: Vec<_> = comms
        .iter()
        .map(|comm| Writer::<_, T>::create(comm, path, Method::Posix, layout).unwrap())
        .collect();
    for _ in 0..n_steps {
        // rank 0 publishes the step, so it closes last
        for writer in writers.iter_mut().rev() {
            writer.put_step().unwrap();
        }
    }
}
