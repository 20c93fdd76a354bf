//! Filesystem collaborator. The session only ever sees virtual absolute
//! paths rooted at `/`; `MountFs` maps those onto a configured mount
//! point on the real filesystem.

use std::fs::{self, File, OpenOptions, ReadDir};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    Append,
}

#[derive(Debug, Clone, Copy)]
pub struct FileInfo {
    pub size: u64,
    pub mtime: SystemTime,
    pub is_dir: bool,
}

#[derive(Debug, Clone)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
    pub size: u64,
    pub mtime: SystemTime,
}

pub trait FileHandle: Send {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
    fn write_all(&mut self, buf: &[u8]) -> io::Result<()>;
}

pub trait DirHandle: Send {
    /// Returns the next entry, or `None` once the directory is exhausted.
    /// `.` and `..` never appear.
    fn next_entry(&mut self) -> io::Result<Option<DirEntry>>;
}

pub trait Filesystem: Send {
    fn open(&self, vpath: &str, mode: OpenMode) -> io::Result<Box<dyn FileHandle>>;
    fn open_dir(&self, vpath: &str) -> io::Result<Box<dyn DirHandle>>;
    fn stat(&self, vpath: &str) -> io::Result<FileInfo>;
    fn remove_file(&self, vpath: &str) -> io::Result<()>;
    fn remove_dir(&self, vpath: &str) -> io::Result<()>;
    fn create_dir(&self, vpath: &str) -> io::Result<()>;
    fn rename(&self, from: &str, to: &str) -> io::Result<()>;
}

/// Production filesystem rooted at a mount point.
pub struct MountFs {
    root: PathBuf,
}

impl MountFs {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn full(&self, vpath: &str) -> PathBuf {
        self.root.join(vpath.trim_start_matches('/'))
    }
}

impl Filesystem for MountFs {
    fn open(&self, vpath: &str, mode: OpenMode) -> io::Result<Box<dyn FileHandle>> {
        let full = self.full(vpath);
        let file = match mode {
            OpenMode::Read => File::open(&full)?,
            OpenMode::Write => File::create(&full)?,
            OpenMode::Append => OpenOptions::new().create(true).append(true).open(&full)?,
        };
        Ok(Box::new(MountFile { file }))
    }

    fn open_dir(&self, vpath: &str) -> io::Result<Box<dyn DirHandle>> {
        let inner = fs::read_dir(self.full(vpath))?;
        Ok(Box::new(MountDir { inner }))
    }

    fn stat(&self, vpath: &str) -> io::Result<FileInfo> {
        let meta = fs::metadata(self.full(vpath))?;
        Ok(FileInfo {
            size: meta.len(),
            mtime: meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            is_dir: meta.is_dir(),
        })
    }

    fn remove_file(&self, vpath: &str) -> io::Result<()> {
        fs::remove_file(self.full(vpath))
    }

    fn remove_dir(&self, vpath: &str) -> io::Result<()> {
        fs::remove_dir(self.full(vpath))
    }

    fn create_dir(&self, vpath: &str) -> io::Result<()> {
        fs::create_dir(self.full(vpath))
    }

    fn rename(&self, from: &str, to: &str) -> io::Result<()> {
        fs::rename(self.full(from), self.full(to))
    }
}

struct MountFile {
    file: File,
}

impl FileHandle for MountFile {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.file.read(buf)
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.file.write_all(buf)
    }
}

struct MountDir {
    inner: ReadDir,
}

impl DirHandle for MountDir {
    fn next_entry(&mut self) -> io::Result<Option<DirEntry>> {
        let entry = match self.inner.next() {
            None => return Ok(None),
            Some(entry) => entry?,
        };
        let name = entry.file_name().to_string_lossy().into_owned();
        // An entry whose metadata cannot be read is still listed.
        let (is_dir, size, mtime) = match entry.metadata() {
            Ok(meta) => (
                meta.is_dir(),
                meta.len(),
                meta.modified().unwrap_or(SystemTime::UNIX_EPOCH),
            ),
            Err(_) => (false, 0, SystemTime::UNIX_EPOCH),
        };
        Ok(Some(DirEntry {
            name,
            is_dir,
            size,
            mtime,
        }))
    }
}
