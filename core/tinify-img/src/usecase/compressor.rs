//! 月間無料枠を考慮したバッチ圧縮
//!
//! 状態遷移: Uninitialized -> Validated -> Processing -> Done。
//! 検証に失敗すると ValidationFailed で止まり、以後は何もしない。
//! 残り回数はサーバー側の使用回数から毎回計算する（同じキーを他のプロセスが使っていても追従する）。

use crate::domain::{remaining_from_used, ApiKey, BatchResult, ImageSet, ItemOutcome};
use crate::ports::outbound::{CompressionService, ServiceError};
use crate::usecase::discovery::{total_size, KIB};
use common::error::Error;
use common::ports::outbound::{FileSystem, Log, LogLevel, LogRecord};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Uninitialized,
    Validated,
    Processing,
    Done,
    ValidationFailed,
}

/// 圧縮サービスのハンドルを受け取り、1 回の実行分のバッチを処理する
pub struct QuotaProcessor {
    service: Arc<dyn CompressionService>,
    fs: Arc<dyn FileSystem>,
    log: Arc<dyn Log>,
    phase: Phase,
    key: Option<ApiKey>,
}

impl QuotaProcessor {
    pub fn new(
        service: Arc<dyn CompressionService>,
        fs: Arc<dyn FileSystem>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            service,
            fs,
            log,
            phase: Phase::Uninitialized,
            key: None,
        }
    }

    #[cfg(test)]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    fn emit(&self, level: LogLevel, kind: &str, message: String) {
        let _ = self
            .log
            .log(&LogRecord::new(level, message).layer("usecase").kind(kind));
    }

    /// API キーを保存し、サービスに往復 1 回で検証させる。失敗したら以後の処理は全て不可。
    pub fn initialize(&mut self, key: ApiKey) -> Result<(), Error> {
        if self.phase == Phase::ValidationFailed {
            return Err(Error::auth("API key validation already failed"));
        }
        match self.service.validate(&key) {
            Ok(()) => {
                self.key = Some(key);
                self.phase = Phase::Validated;
                Ok(())
            }
            Err(e) => {
                self.key = None;
                self.phase = Phase::ValidationFailed;
                Err(match e {
                    ServiceError::Auth(msg) => Error::Auth(msg),
                    other => Error::auth(format!("Could not validate API key: {}", other)),
                })
            }
        }
    }

    fn validated_key(&self) -> Result<&ApiKey, Error> {
        self.key.as_ref().ok_or(Error::Uninitialized)
    }

    fn live_remaining(&self, key: &ApiKey) -> Result<u32, ServiceError> {
        self.service.used_count(key).map(remaining_from_used)
    }

    /// 今月の残り無料圧縮回数（0 未満にはならない）
    pub fn remaining_free_compressions(&self) -> Result<u32, Error> {
        let key = self.validated_key()?;
        Ok(self.live_remaining(key)?)
    }

    pub fn can_compress(&self) -> Result<bool, Error> {
        Ok(self.remaining_free_compressions()? > 0)
    }

    /// 1 ファイルを圧縮する。失敗はログに出して ItemOutcome::Failed で返す（Err は未初期化のときだけ）。
    pub fn compress_one(&self, path: &Path) -> Result<ItemOutcome, Error> {
        let key = self.validated_key()?;
        Ok(self.compress_with(key, path))
    }

    fn compress_with(&self, key: &ApiKey, path: &Path) -> ItemOutcome {
        self.emit(LogLevel::Debug, "batch", format!("Processing {}", path.display()));
        match self.service.compress(key, path) {
            Ok(()) => {
                self.emit(LogLevel::Debug, "batch", format!("Processed {}", path.display()));
                ItemOutcome::Compressed
            }
            Err(e) => self.failed(path, e),
        }
    }

    fn failed(&self, path: &Path, e: ServiceError) -> ItemOutcome {
        let message = e.to_string();
        self.emit(
            LogLevel::Error,
            "error",
            format!("{} failed because {}", path.display(), message),
        );
        ItemOutcome::Failed(message)
    }

    fn process(&self, key: &ApiKey, path: &Path, dry_run: bool) -> ItemOutcome {
        let remaining = match self.live_remaining(key) {
            Ok(n) => n,
            Err(e) => return self.failed(path, e),
        };
        if remaining == 0 {
            self.emit(
                LogLevel::Warn,
                "quota",
                format!(
                    "Skipping {}: monthly compression quota reached",
                    path.display()
                ),
            );
            return ItemOutcome::SkippedForQuota;
        }
        if dry_run {
            self.emit(
                LogLevel::Debug,
                "batch",
                format!("Dry run, leaving {} untouched", path.display()),
            );
            return ItemOutcome::Untouched;
        }
        self.compress_with(key, path)
    }

    /// 発見順に 1 ファイルずつ処理する。各ファイルの前に残り回数を問い合わせ直す。
    ///
    /// 1 ファイルの失敗でバッチは止めない。dry run では圧縮を呼ばず、size_after は size_before のまま。
    pub fn run_batch(&mut self, images: &ImageSet, dry_run: bool) -> Result<BatchResult, Error> {
        let key = self.validated_key()?.clone();
        let size_before = total_size(self.fs.as_ref(), images, KIB)?;
        let mut result = BatchResult::new(images.len(), size_before, dry_run);

        self.phase = Phase::Processing;
        for path in images.iter() {
            let outcome = self.process(&key, path, dry_run);
            result.record(&outcome);
        }
        if !dry_run {
            result.size_after = total_size(self.fs.as_ref(), images, KIB)?;
        }
        self.phase = Phase::Done;
        Ok(result)
    }
}
