//! 画像の発見と絞り込み
//!
//! - list_images: ルート以下を再帰的に走査し、拡張子 png / jpg / jpeg（大文字小文字は区別）を集める
//! - filter_by_recency: 最終アクティビティが直近 n 日以内のものだけ残す
//! - total_size: 合計サイズを 1024^power で割り、小数第 1 位で切り捨てる

use crate::domain::{truncate_one_decimal, ImageSet};
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem, Log, LogLevel, LogRecord};
use std::collections::HashSet;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// 対象拡張子（ドットなし、大文字小文字は区別する）
pub const IMAGE_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// total_size の単位: KiB
pub const KIB: i32 = 1;

const SECONDS_PER_DAY: f64 = 24.0 * 60.0 * 60.0;

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// ドットで始まるエントリ（隠しファイル・隠しディレクトリ）は glob と同様に対象外
fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(OsStr::to_str)
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

/// ルート以下の画像を発見順（ディレクトリ内はパス順）に返す。
///
/// シンボリックリンク等で同じ実体に複数のパスから届く場合は、最初に見つけたパスだけを残す。
/// 読めないディレクトリは警告を出して読み飛ばす。ルートが無い・ディレクトリでない場合は空になる。
pub fn list_images(fs: &dyn FileSystem, log: &dyn Log, root: &Path) -> ImageSet {
    let mut found = Vec::new();
    match fs.metadata(root) {
        Ok(meta) if meta.is_dir() => {
            let mut walker = Walker {
                fs,
                log,
                seen_dirs: HashSet::new(),
                seen_files: HashSet::new(),
            };
            walker.walk(root, &mut found);
        }
        Ok(_) => warn(log, format!("{} is not a folder", root.display())),
        Err(e) => warn(log, format!("Cannot read folder {}: {}", root.display(), e)),
    }
    ImageSet::new(found)
}

fn warn(log: &dyn Log, message: String) {
    let _ = log.log(
        &LogRecord::new(LogLevel::Warn, message)
            .layer("usecase")
            .kind("discovery"),
    );
}

struct Walker<'a> {
    fs: &'a dyn FileSystem,
    log: &'a dyn Log,
    seen_dirs: HashSet<PathBuf>,
    seen_files: HashSet<PathBuf>,
}

impl Walker<'_> {
    fn walk(&mut self, dir: &Path, found: &mut Vec<PathBuf>) {
        // ディレクトリへのリンクがループしていても一度しか入らない
        let canonical = match self.fs.canonicalize(dir) {
            Ok(p) => p,
            Err(e) => return self.skip(dir, e),
        };
        if !self.seen_dirs.insert(canonical) {
            return;
        }
        let mut entries = match self.fs.read_dir(dir) {
            Ok(entries) => entries,
            Err(e) => return self.skip(dir, e),
        };
        entries.sort();
        for entry in entries {
            if is_hidden(&entry) {
                continue;
            }
            // 壊れたリンクなどメタデータが取れないものは読み飛ばす
            let Ok(meta) = self.fs.metadata(&entry) else {
                continue;
            };
            if meta.is_dir() {
                self.walk(&entry, found);
            } else if meta.is_file() && has_image_extension(&entry) {
                match self.fs.canonicalize(&entry) {
                    Ok(c) => {
                        if self.seen_files.insert(c) {
                            found.push(entry);
                        }
                    }
                    Err(e) => self.skip(&entry, e),
                }
            }
        }
    }

    fn skip(&self, path: &Path, e: Error) {
        warn(self.log, format!("Skipping {}: {}", path.display(), e));
    }
}

/// 最終アクティビティ（max(mtime, ctime)）が `now - days * 86400` 秒より新しいものだけ残す。
/// 境界ちょうどは除外する。
pub fn filter_by_recency(
    fs: &dyn FileSystem,
    clock: &dyn Clock,
    days: f64,
    images: &ImageSet,
) -> Result<ImageSet, Error> {
    let now_secs = clock.now_ms() as f64 / 1000.0;
    let threshold = now_secs - days * SECONDS_PER_DAY;
    let mut kept = Vec::new();
    for path in images.iter() {
        if fs.metadata(path)?.last_activity_secs() > threshold {
            kept.push(path.clone());
        }
    }
    Ok(ImageSet::new(kept))
}

/// 合計バイト数を 1024^unit_power で割り、小数第 1 位で切り捨てた値
pub fn total_size(fs: &dyn FileSystem, images: &ImageSet, unit_power: i32) -> Result<f64, Error> {
    let mut bytes: u64 = 0;
    for path in images.iter() {
        bytes += fs.metadata(path)?.len();
    }
    Ok(truncate_one_decimal(bytes as f64 / 1024f64.powi(unit_power)))
}
