//! tinify-img 共通ライブラリ
//!
//! エラー型、Outbound ポート（FS・時刻・環境変数・ログ）と、その標準アダプターを提供します。

/// エラーハンドリング
pub mod error;

/// Ports & Adapters のポート定義
pub mod ports;

/// ポートの標準実装
pub mod adapter;
