//! Tinify (TinyPNG) API の CompressionService 実装
//!
//! - 認証は HTTP Basic（ユーザー名 `api`、パスワードに API キー）
//! - 使用回数は全レスポンスの `Compression-Count` ヘッダに載る
//! - 空ボディの POST /shrink は 400 (InputMissing) を返すだけで回数を消費しないので、
//!   キーの検証と使用回数の問い合わせに使う

use crate::domain::ApiKey;
use crate::ports::outbound::{CompressionService, ServiceError};
use common::error::Error;
use common::ports::outbound::FileSystem;
use reqwest::blocking::{Client, Response};
use reqwest::StatusCode;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.tinify.com";
const COMPRESSION_COUNT_HEADER: &str = "Compression-Count";
const USER_AGENT: &str = concat!("tinify-img/", env!("CARGO_PKG_VERSION"));
const TIMEOUT: Duration = Duration::from_secs(120);

/// エラーレスポンスのボディ（例: {"error":"Unauthorized","message":"Credentials are invalid."}）
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: String,
    message: String,
}

/// Tinify API クライアント（blocking）
pub struct TinifyClient {
    http: Client,
    endpoint: String,
    fs: Arc<dyn FileSystem>,
}

impl TinifyClient {
    /// endpoint が None なら DEFAULT_ENDPOINT を使う
    pub fn new(endpoint: Option<String>, fs: Arc<dyn FileSystem>) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| Error::io_msg(format!("Failed to build HTTP client: {}", e)))?;
        let endpoint = endpoint
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string())
            .trim_end_matches('/')
            .to_string();
        Ok(Self { http, endpoint, fs })
    }

    fn shrink_url(&self) -> String {
        format!("{}/shrink", self.endpoint)
    }

    /// 空ボディで /shrink を叩き、キーが有効なら Compression-Count を返す
    fn probe(&self, key: &ApiKey) -> Result<Option<u32>, ServiceError> {
        let response = self
            .http
            .post(self.shrink_url())
            .basic_auth("api", Some(key.as_ref()))
            .send()
            .map_err(transport)?;
        let count = compression_count(&response);
        match response.status() {
            // 400: 入力なし（キーは有効）、429: 今月の上限到達（キーは有効）
            s if s.is_success()
                || s == StatusCode::BAD_REQUEST
                || s == StatusCode::TOO_MANY_REQUESTS =>
            {
                Ok(count)
            }
            _ => Err(error_from_response(response)),
        }
    }
}

fn transport(e: reqwest::Error) -> ServiceError {
    ServiceError::Transport(format!("Error while connecting: {}", e))
}

fn compression_count(response: &Response) -> Option<u32> {
    response
        .headers()
        .get(COMPRESSION_COUNT_HEADER)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.trim().parse().ok())
}

/// ステータスとボディから ServiceError を組み立てる
fn error_from_response(response: Response) -> ServiceError {
    let status = response.status();
    let body = response.text().unwrap_or_default();
    classify_error(status, &body)
}

fn classify_error(status: StatusCode, body: &str) -> ServiceError {
    let message = match serde_json::from_str::<ApiErrorBody>(body) {
        Ok(b) => format!("{} (HTTP {}/{})", b.message, status.as_u16(), b.error),
        Err(_) => format!("Error while parsing response: HTTP {}", status.as_u16()),
    };
    if status == StatusCode::UNAUTHORIZED {
        ServiceError::Auth(message)
    } else {
        ServiceError::Compression(message)
    }
}

impl CompressionService for TinifyClient {
    fn validate(&self, key: &ApiKey) -> Result<(), ServiceError> {
        self.probe(key).map(|_| ())
    }

    fn used_count(&self, key: &ApiKey) -> Result<u32, ServiceError> {
        self.probe(key)?.ok_or_else(|| {
            ServiceError::Transport(format!(
                "response carried no {} header",
                COMPRESSION_COUNT_HEADER
            ))
        })
    }

    fn compress(&self, key: &ApiKey, path: &Path) -> Result<(), ServiceError> {
        let source = self
            .fs
            .read(path)
            .map_err(|e| ServiceError::Compression(e.to_string()))?;
        let response = self
            .http
            .post(self.shrink_url())
            .basic_auth("api", Some(key.as_ref()))
            .body(source)
            .send()
            .map_err(transport)?;
        if !response.status().is_success() {
            return Err(error_from_response(response));
        }
        let location = response
            .headers()
            .get(reqwest::header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
            .ok_or_else(|| {
                ServiceError::Compression("response carried no Location header".to_string())
            })?;

        let output = self
            .http
            .get(&location)
            .basic_auth("api", Some(key.as_ref()))
            .send()
            .map_err(transport)?;
        if !output.status().is_success() {
            return Err(error_from_response(output));
        }
        let bytes = output.bytes().map_err(transport)?;
        self.fs
            .write(path, &bytes)
            .map_err(|e| ServiceError::Compression(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::adapter::StdFileSystem;

    #[test]
    fn test_classify_unauthorized_as_auth() {
        let err = classify_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":"Unauthorized","message":"Credentials are invalid."}"#,
        );
        assert_eq!(
            err,
            ServiceError::Auth("Credentials are invalid. (HTTP 401/Unauthorized)".to_string())
        );
    }

    #[test]
    fn test_classify_client_error_as_compression() {
        let err = classify_error(
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            r#"{"error":"Unsupported media type","message":"File type is not supported."}"#,
        );
        assert!(matches!(err, ServiceError::Compression(ref m) if m.contains("HTTP 415")));
    }

    #[test]
    fn test_classify_unparseable_body() {
        let err = classify_error(StatusCode::BAD_GATEWAY, "<html>oops</html>");
        assert_eq!(
            err,
            ServiceError::Compression("Error while parsing response: HTTP 502".to_string())
        );
    }

    #[test]
    fn test_endpoint_trailing_slash_is_trimmed() {
        let client =
            TinifyClient::new(Some("http://127.0.0.1:9/".to_string()), Arc::new(StdFileSystem))
                .unwrap();
        assert_eq!(client.shrink_url(), "http://127.0.0.1:9/shrink");

        let client = TinifyClient::new(None, Arc::new(StdFileSystem)).unwrap();
        assert_eq!(client.shrink_url(), "https://api.tinify.com/shrink");
    }

    #[test]
    fn test_compress_unreadable_file_is_compression_error() {
        let dir = tempfile::tempdir().unwrap();
        let client =
            TinifyClient::new(Some("http://127.0.0.1:9".to_string()), Arc::new(StdFileSystem))
                .unwrap();
        let err = client
            .compress(&ApiKey::new("k"), &dir.path().join("missing.png"))
            .unwrap_err();
        assert!(matches!(err, ServiceError::Compression(_)));
    }
}
