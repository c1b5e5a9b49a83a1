//! 圧縮サービス Outbound ポート
//!
//! 使用回数はサーバー側が正。ローカルでは保持も減算もせず、毎回問い合わせる。

use crate::domain::ApiKey;
use common::error::Error;
use std::path::Path;

/// 圧縮サービスのエラー
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ServiceError {
    /// API キーが無効
    #[error("{0}")]
    Auth(String),
    /// 1 ファイルの圧縮に失敗（バッチは続行）
    #[error("{0}")]
    Compression(String),
    /// 通信エラー
    #[error("{0}")]
    Transport(String),
}

impl From<ServiceError> for Error {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Auth(msg) => Error::Auth(msg),
            ServiceError::Compression(msg) | ServiceError::Transport(msg) => Error::Io(msg),
        }
    }
}

/// 圧縮サービス抽象（Outbound ポート）
///
/// 実装は `adapter::TinifyClient` やテスト用の `StubCompressionService`。
pub trait CompressionService: Send + Sync {
    /// API キーを往復 1 回で検証する
    fn validate(&self, key: &ApiKey) -> Result<(), ServiceError>;

    /// 今月の使用回数（サーバーが報告する最新値）
    fn used_count(&self, key: &ApiKey) -> Result<u32, ServiceError>;

    /// ファイルを圧縮し、同じパスに上書きする
    fn compress(&self, key: &ApiKey, path: &Path) -> Result<(), ServiceError>;
}
