//! 環境変数解決 Outbound ポート
//!
//! usecase / wiring はこの trait 経由でのみ環境変数にアクセスする。

/// API キーのフォールバック（--key 未指定時）
pub const ENV_API_KEY: &str = "TINIFY_API_KEY";
/// 圧縮サービスのベース URL 上書き
pub const ENV_API_ENDPOINT: &str = "TINIFY_API_ENDPOINT";
/// JSONL ログの出力先ファイル
pub const ENV_LOG_FILE: &str = "TINIFY_IMG_LOG_FILE";

/// 環境変数解決抽象（Outbound ポート）
///
/// 実装は `common::adapter::StdEnvResolver` やテスト用のモックなど。
pub trait EnvResolver: Send + Sync {
    /// 環境変数を読む。未設定・空文字は None
    fn var(&self, name: &str) -> Option<String>;

    /// TINIFY_API_KEY
    fn api_key(&self) -> Option<String> {
        self.var(ENV_API_KEY)
    }

    /// TINIFY_API_ENDPOINT
    fn api_endpoint(&self) -> Option<String> {
        self.var(ENV_API_ENDPOINT)
    }

    /// TINIFY_IMG_LOG_FILE
    fn log_file(&self) -> Option<std::path::PathBuf> {
        self.var(ENV_LOG_FILE).map(std::path::PathBuf::from)
    }
}
