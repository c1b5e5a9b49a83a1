//! Outbound ポート: アプリが外部の圧縮サービスを使うための trait

pub mod compression_service;

pub use compression_service::{CompressionService, ServiceError};
