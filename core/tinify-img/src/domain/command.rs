//! CLI から解決されたコマンド

use super::ApiKey;
use std::path::PathBuf;

/// 1 回の実行で何をするか
#[derive(Debug, Clone, PartialEq)]
pub enum TinifyCommand {
    Help,
    Compress(CompressRequest),
}

/// フォルダ内の画像を圧縮する要求
#[derive(Debug, Clone, PartialEq)]
pub struct CompressRequest {
    pub folder: PathBuf,
    pub key: ApiKey,
    /// 直近 n 日（小数可）に更新されたファイルだけを対象にする
    pub days: Option<f64>,
    pub dry_run: bool,
}
