//! テスト用: 台本どおりに振る舞う CompressionService 実装

use crate::domain::ApiKey;
use crate::ports::outbound::{CompressionService, ServiceError};
use common::ports::outbound::FileSystem;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// テスト用: 使用回数をメモリで持ち、圧縮成功時はファイルを半分のサイズにする Stub
pub struct StubCompressionService {
    valid_key: String,
    used: Mutex<u32>,
    /// used_count を問い合わせるたびに他の利用者が消費する回数
    concurrent_usage: u32,
    /// この回数目以降の used_count 問い合わせは通信エラーになる
    outage_from: Option<u32>,
    quota_queries: Mutex<u32>,
    failures: HashMap<PathBuf, String>,
    compressed: Mutex<Vec<PathBuf>>,
    validations: Mutex<u32>,
    fs: Option<Arc<dyn FileSystem>>,
}

impl StubCompressionService {
    pub fn new(valid_key: &str) -> Self {
        Self {
            valid_key: valid_key.to_string(),
            used: Mutex::new(0),
            concurrent_usage: 0,
            outage_from: None,
            quota_queries: Mutex::new(0),
            failures: HashMap::new(),
            compressed: Mutex::new(Vec::new()),
            validations: Mutex::new(0),
            fs: None,
        }
    }

    pub fn with_used(self, used: u32) -> Self {
        *self.used.lock().unwrap() = used;
        self
    }

    pub fn with_concurrent_usage(mut self, per_query: u32) -> Self {
        self.concurrent_usage = per_query;
        self
    }

    pub fn with_quota_outage_from(mut self, query_no: u32) -> Self {
        self.outage_from = Some(query_no);
        self
    }

    pub fn failing_on(mut self, path: impl Into<PathBuf>, message: &str) -> Self {
        self.failures.insert(path.into(), message.to_string());
        self
    }

    /// 圧縮成功時にこの FS 上のファイルを半分に縮める
    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = Some(fs);
        self
    }

    pub fn used(&self) -> u32 {
        *self.used.lock().unwrap()
    }

    pub fn compress_calls(&self) -> usize {
        self.compressed.lock().unwrap().len()
    }

    pub fn compressed_paths(&self) -> Vec<PathBuf> {
        self.compressed.lock().unwrap().clone()
    }

    pub fn validations(&self) -> u32 {
        *self.validations.lock().unwrap()
    }

    fn check_key(&self, key: &ApiKey) -> Result<(), ServiceError> {
        if key.as_ref() == self.valid_key {
            Ok(())
        } else {
            Err(ServiceError::Auth("Credentials are invalid.".to_string()))
        }
    }
}

impl CompressionService for StubCompressionService {
    fn validate(&self, key: &ApiKey) -> Result<(), ServiceError> {
        *self.validations.lock().unwrap() += 1;
        self.check_key(key)
    }

    fn used_count(&self, key: &ApiKey) -> Result<u32, ServiceError> {
        self.check_key(key)?;
        let mut queries = self.quota_queries.lock().unwrap();
        *queries += 1;
        if self.outage_from.is_some_and(|from| *queries >= from) {
            return Err(ServiceError::Transport("connection reset by peer".to_string()));
        }
        let mut used = self.used.lock().unwrap();
        *used += self.concurrent_usage;
        Ok(*used)
    }

    fn compress(&self, key: &ApiKey, path: &Path) -> Result<(), ServiceError> {
        self.check_key(key)?;
        if let Some(message) = self.failures.get(path) {
            return Err(ServiceError::Compression(message.clone()));
        }
        if let Some(fs) = &self.fs {
            let data = fs
                .read(path)
                .map_err(|e| ServiceError::Compression(e.to_string()))?;
            fs.write(path, &data[..data.len() / 2])
                .map_err(|e| ServiceError::Compression(e.to_string()))?;
        }
        *self.used.lock().unwrap() += 1;
        self.compressed.lock().unwrap().push(path.to_path_buf());
        Ok(())
    }
}
