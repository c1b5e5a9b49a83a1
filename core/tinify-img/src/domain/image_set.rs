//! 処理対象の画像パス列（発見順）。一度作ったら追加・削除しない。

use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageSet(Vec<PathBuf>);

impl ImageSet {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }
}

impl std::ops::Deref for ImageSet {
    type Target = [PathBuf];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromIterator<PathBuf> for ImageSet {
    fn from_iter<I: IntoIterator<Item = PathBuf>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
