use std::{
    fs::{self, File, OpenOptions, ReadDir},
    io::{self, Write as _},
    path::{Path, PathBuf},
};

pub mod error {
    use std::{io, path::PathBuf};

    pub type Result<T> = std::result::Result<T, self::Error>;

    type Msg = &'static str;

    #[derive(Debug, thiserror::Error)]
    pub enum Error {
        #[error("{0} ({1}): {2}")]
        SingleIO(Msg, PathBuf, #[source] io::Error),

        #[error("Refusing to overwrite existing file '{0}'")]
        AlreadyExists(PathBuf),

        #[error("Not a directory: '{0}'")]
        NotADir(PathBuf),
    }
}
pub use error::{Error, Result};

#[must_use]
pub fn mkdir_all(path: impl AsRef<Path>) -> Result<()> {
    let dir = path.as_ref();
    fs::create_dir_all(dir).map_err(|e| Error::SingleIO("Cannot create dir", dir.to_owned(), e))
}

#[must_use]
pub fn read_to_string(filepath: impl AsRef<Path>) -> Result<String> {
    fs::read_to_string(&filepath)
        .map_err(|e| Error::SingleIO("Cannot read file", filepath.as_ref().to_owned(), e))
}

#[must_use]
pub fn read_dir(dir: impl AsRef<Path>) -> Result<ReadDir> {
    fs::read_dir(&dir).map_err(|e| Error::SingleIO("Cannot read dir", dir.as_ref().to_owned(), e))
}

/// Returns the immediate subdirectories of `dir`, sorted by file name.
/// Entries whose type cannot be determined are skipped.
pub fn list_subdirs(dir: impl AsRef<Path>) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(Error::NotADir(dir.to_owned()));
    }

    let mut res = Vec::new();
    for entry in self::read_dir(dir)?.filter_map(std::result::Result::ok) {
        let Ok(ft) = entry.file_type() else {
            log::warn!("Cannot get filetype of {:?}, skipping", entry.path());
            continue;
        };
        if ft.is_dir() {
            res.push(entry.path());
        }
    }
    res.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(res)
}

/// Fails with [`Error::AlreadyExists`] when `filepath` is already present.
pub fn ensure_absent(filepath: impl AsRef<Path>) -> Result<()> {
    let filepath = filepath.as_ref();
    if filepath.exists() {
        return Err(Error::AlreadyExists(filepath.to_owned()));
    }
    Ok(())
}

/// Opens a brand new file for writing. Never truncates an existing one.
#[must_use]
pub fn create_new(filepath: impl AsRef<Path>) -> Result<File> {
    let filepath = filepath.as_ref();
    if let Some(dir) = filepath.parent().filter(|d| !d.as_os_str().is_empty()) {
        self::mkdir_all(dir)?;
    }
    OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(filepath)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::AlreadyExists(filepath.to_owned()),
            _ => Error::SingleIO("Cannot create file", filepath.to_owned(), e),
        })
}
