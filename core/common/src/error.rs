//! エラーハンドリング
//!
//! 全レイヤー共通のエラー型。バリアントごとにプロセスの終了コードが決まる。

/// 終了コード: 認証失敗（API キー検証エラー）
pub const EXIT_AUTH: i32 = 1;
/// 終了コード: 引数不正（sysexits の EX_USAGE）
pub const EXIT_USAGE: i32 = 64;
/// 終了コード: 内部エラー（EX_SOFTWARE）
pub const EXIT_SOFTWARE: i32 = 70;
/// 終了コード: I/O エラー（EX_IOERR）
pub const EXIT_IO: i32 = 74;

/// エラー型
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// 引数不正（usage を表示して終了）
    #[error("{0}")]
    InvalidArgument(String),
    /// API キーの検証に失敗した
    #[error("{0}")]
    Auth(String),
    #[error("{0}")]
    Io(String),
    #[error("JSON error: {0}")]
    Json(String),
    #[error("{0}")]
    Env(String),
    /// 検証前に圧縮サービスを使おうとした（プログラミングエラー）
    #[error("compression service is not initialized: call initialize() first")]
    Uninitialized,
}

impl Error {
    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Self::InvalidArgument(msg.into())
    }

    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    pub fn io_msg(msg: impl Into<String>) -> Self {
        Self::Io(msg.into())
    }

    pub fn env(msg: impl Into<String>) -> Self {
        Self::Env(msg.into())
    }

    /// usage を表示すべきエラーか
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::InvalidArgument(_))
    }

    /// プロセスの終了コード
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InvalidArgument(_) => EXIT_USAGE,
            Self::Auth(_) => EXIT_AUTH,
            Self::Io(_) => EXIT_IO,
            Self::Json(_) | Self::Env(_) | Self::Uninitialized => EXIT_SOFTWARE,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}
