//! Names of the groups, variables and files a put/get stream is made of.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub const N_DATASETS_PER_WRITER: &str = "n_datasets_per_writer";
pub const N_WRITERS: &str = "n_writers";
pub const NUMBER_OF_ELEMENTS: &str = "number_of_elements";
pub const DATA: &str = "data";

/// Root attribute recording whether the stream was written as per-rank subfiles.
pub const SUBFILED_ATTR: &str = "subfiled";

/// Array id used by the `put` and `get` programs.
pub const PRIMARY_ARRAY: usize = 0;

const STEP_PREFIX: &str = "step_";

pub fn step_group(step: usize) -> String {
    format!("{}{}", STEP_PREFIX, step)
}

/// Returns the step index encoded in a group name like `step_7`.
pub fn parse_step(name: &str) -> Option<usize> {
    let digits = name.strip_prefix(STEP_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// `dataset_<id>/array_<id>`
pub fn array_path(dataset_id: usize, array_id: usize) -> String {
    format!("dataset_{}/array_{}", dataset_id, array_id)
}

pub fn elements_path(dataset_id: usize, array_id: usize) -> String {
    format!("{}/{}", array_path(dataset_id, array_id), NUMBER_OF_ELEMENTS)
}

pub fn data_path(dataset_id: usize, array_id: usize) -> String {
    format!("{}/{}", array_path(dataset_id, array_id), DATA)
}

/// Directory holding the per-rank subfiles of `path`: `<path>.dir`.
pub fn subfile_dir(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(".dir");
    path.with_file_name(name)
}

/// Subfile written by `rank`: `<dir>/<name>.dir/<name>.<rank>`.
pub fn subfile_path(path: &Path, rank: usize) -> PathBuf {
    let mut name = path.file_name().map(OsString::from).unwrap_or_default();
    name.push(format!(".{}", rank));
    subfile_dir(path).join(name)
}

#[cfg(test)]
pub mod tests {
    use std::path::{Path, PathBuf};

    use super::*;

    #[test]
    pub fn test_variable_paths() {
        assert_eq!(array_path(3, 0), "dataset_3/array_0");
        assert_eq!(elements_path(12, 0), "dataset_12/array_0/number_of_elements");
        assert_eq!(data_path(12, 1), "dataset_12/array_1/data");
    }

    #[test]
    pub fn test_step_names() {
        assert_eq!(step_group(0), "step_0");
        assert_eq!(parse_step(&step_group(42)), Some(42));
        assert_eq!(parse_step("step_"), None);
        assert_eq!(parse_step("step_+1"), None);
        assert_eq!(parse_step("step_1a"), None);
        assert_eq!(parse_step("dataset_1"), None);
    }

    #[test]
    pub fn test_subfile_paths() {
        let path = Path::new("/scratch/run/out.h5");
        assert_eq!(subfile_dir(path), PathBuf::from("/scratch/run/out.h5.dir"));
        assert_eq!(subfile_path(path, 3), PathBuf::from("/scratch/run/out.h5.dir/out.h5.3"));
        assert_eq!(subfile_path(Path::new("out"), 0), PathBuf::from("out.dir/out.0"));
    }
}
