//! テスト用: メモリ上のファイルシステム（更新日時を自由に設定できる）

use common::error::Error;
use common::ports::outbound::{FileMetadata, FileSystem};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, UNIX_EPOCH};

#[derive(Debug, Clone)]
struct MemFile {
    data: Vec<u8>,
    modified_ms: u64,
    changed_ms: u64,
}

/// ディレクトリはファイルパスの祖先として暗黙に存在する
#[derive(Debug, Default)]
pub struct MemoryFileSystem {
    files: Mutex<BTreeMap<PathBuf, MemFile>>,
    locked_dirs: Mutex<BTreeSet<PathBuf>>,
}

impl MemoryFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// len バイトのファイルを置く（更新日時・ステータス変更日時は epoch ミリ秒）
    pub fn add_file(&self, path: impl Into<PathBuf>, len: usize, modified_ms: u64, changed_ms: u64) {
        self.files.lock().unwrap().insert(
            path.into(),
            MemFile {
                data: vec![0u8; len],
                modified_ms,
                changed_ms,
            },
        );
    }

    /// read_dir が権限エラーになるディレクトリにする
    pub fn lock_dir(&self, path: impl Into<PathBuf>) {
        self.locked_dirs.lock().unwrap().insert(path.into());
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.files
            .lock()
            .unwrap()
            .keys()
            .any(|p| p != path && p.starts_with(path))
    }
}

fn not_found(path: &Path) -> Error {
    Error::io_msg(format!("No such file or directory: '{}'", path.display()))
}

impl FileSystem for MemoryFileSystem {
    fn read(&self, path: &Path) -> Result<Vec<u8>, Error> {
        self.files
            .lock()
            .unwrap()
            .get(path)
            .map(|f| f.data.clone())
            .ok_or_else(|| not_found(path))
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), Error> {
        let mut files = self.files.lock().unwrap();
        let entry = files.entry(path.to_path_buf()).or_insert(MemFile {
            data: Vec::new(),
            modified_ms: 0,
            changed_ms: 0,
        });
        entry.data = contents.to_vec();
        Ok(())
    }

    fn create_dir_all(&self, _path: &Path) -> Result<(), Error> {
        Ok(())
    }

    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error> {
        if let Some(f) = self.files.lock().unwrap().get(path) {
            return Ok(FileMetadata::new(f.data.len() as u64, true, false).with_times(
                Some(UNIX_EPOCH + Duration::from_millis(f.modified_ms)),
                Some(UNIX_EPOCH + Duration::from_millis(f.changed_ms)),
            ));
        }
        if self.is_dir(path) {
            return Ok(FileMetadata::new(0, false, true));
        }
        Err(not_found(path))
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error> {
        if self.locked_dirs.lock().unwrap().contains(path) {
            return Err(Error::io_msg("Permission denied"));
        }
        if !self.is_dir(path) {
            return Err(Error::io_msg(format!(
                "Failed to read directory '{}': not a directory",
                path.display()
            )));
        }
        let children: BTreeSet<PathBuf> = self
            .files
            .lock()
            .unwrap()
            .keys()
            .filter_map(|p| p.strip_prefix(path).ok())
            .filter_map(|rest| rest.components().next())
            .map(|first| path.join(first))
            .collect();
        Ok(children.into_iter().collect())
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf, Error> {
        if self.exists(path) {
            Ok(path.to_path_buf())
        } else {
            Err(not_found(path))
        }
    }

    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error> {
        Err(Error::io_msg(format!(
            "append is not supported in memory: '{}'",
            path.display()
        )))
    }
}
