//! ファイルシステム Outbound ポート
//!
//! usecase はこの trait 経由でのみファイル I/O を行う。

use crate::error::Error;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

/// ファイルメタデータ（サイズ・種別・更新日時）
#[derive(Debug, Clone)]
pub struct FileMetadata {
    len: u64,
    is_file: bool,
    is_dir: bool,
    modified: Option<SystemTime>,
    /// ステータス変更時刻（unix の ctime。取れない環境では作成日時）
    changed: Option<SystemTime>,
}

impl FileMetadata {
    pub fn new(len: u64, is_file: bool, is_dir: bool) -> Self {
        Self {
            len,
            is_file,
            is_dir,
            modified: None,
            changed: None,
        }
    }

    pub fn with_times(mut self, modified: Option<SystemTime>, changed: Option<SystemTime>) -> Self {
        self.modified = modified;
        self.changed = changed;
        self
    }

    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_file(&self) -> bool {
        self.is_file
    }

    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    pub fn changed(&self) -> Option<SystemTime> {
        self.changed
    }

    /// 最終アクティビティ時刻 = max(更新日時, ステータス変更日時) を epoch 秒で返す。
    /// どちらも取れなければ 0（epoch）。
    pub fn last_activity_secs(&self) -> f64 {
        [self.modified, self.changed]
            .into_iter()
            .flatten()
            .map(epoch_secs)
            .fold(0.0, f64::max)
    }
}

fn epoch_secs(t: SystemTime) -> f64 {
    match t.duration_since(UNIX_EPOCH) {
        Ok(d) => d.as_secs_f64(),
        Err(e) => -e.duration().as_secs_f64(),
    }
}

/// ファイルシステム抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdFileSystem` やテスト用のメモリ FS など。
pub trait FileSystem: Send + Sync {
    fn read(&self, path: &Path) -> Result<Vec<u8>, Error>;
    /// ファイルを丸ごと置き換える
    fn write(&self, path: &Path, contents: &[u8]) -> Result<(), Error>;
    fn create_dir_all(&self, path: &Path) -> Result<(), Error>;
    fn metadata(&self, path: &Path) -> Result<FileMetadata, Error>;
    /// ディレクトリ直下のエントリのフルパス一覧
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>, Error>;
    fn canonicalize(&self, path: &Path) -> Result<PathBuf, Error>;
    /// 追記用に開く（存在しなければ作成）。返した Writer を drop すると閉じる。
    fn open_append(&self, path: &Path) -> Result<Box<dyn std::io::Write + Send>, Error>;

    /// パスが存在するか（metadata が取れれば true）
    fn exists(&self, path: &Path) -> bool {
        self.metadata(path).is_ok()
    }
}
