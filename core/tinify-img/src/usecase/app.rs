//! フォルダ圧縮ユースケース（検証 → 発見 → 絞り込み → バッチ → 報告）

use crate::domain::{BatchResult, CompressRequest};
use crate::ports::outbound::CompressionService;
use crate::usecase::compressor::QuotaProcessor;
use crate::usecase::discovery::{filter_by_recency, list_images, total_size, KIB};
use common::error::Error;
use common::ports::outbound::{Clock, FileSystem, Log, LogLevel, LogRecord};
use std::sync::Arc;

/// フォルダ内の画像を圧縮するユースケース
///
/// 圧縮サービスのハンドルは wiring で 1 度だけ作って注入する。
pub struct TinifyUseCase {
    service: Arc<dyn CompressionService>,
    fs: Arc<dyn FileSystem>,
    clock: Arc<dyn Clock>,
    log: Arc<dyn Log>,
}

impl TinifyUseCase {
    pub fn new(
        service: Arc<dyn CompressionService>,
        fs: Arc<dyn FileSystem>,
        clock: Arc<dyn Clock>,
        log: Arc<dyn Log>,
    ) -> Self {
        Self {
            service,
            fs,
            clock,
            log,
        }
    }

    fn emit(&self, level: LogLevel, kind: &str, message: String) {
        let _ = self
            .log
            .log(&LogRecord::new(level, message).layer("usecase").kind(kind));
    }

    /// 1 回分の実行。処理対象が無ければ Ok(None)。
    ///
    /// API キーの検証はファイルの発見より前に行い、失敗したら何もせず Err(Auth) を返す。
    pub fn compress_folder(&self, req: &CompressRequest) -> Result<Option<BatchResult>, Error> {
        self.emit(
            LogLevel::Info,
            "lifecycle",
            "Running tinify script for images in a folder".to_string(),
        );
        if req.dry_run {
            self.emit(LogLevel::Info, "lifecycle", "This is a dry run".to_string());
        }

        let mut processor = QuotaProcessor::new(
            Arc::clone(&self.service),
            Arc::clone(&self.fs),
            Arc::clone(&self.log),
        );
        processor.initialize(req.key.clone())?;
        let remaining = processor.remaining_free_compressions()?;
        self.emit(
            LogLevel::Info,
            "quota",
            format!("Remaining compressions: {}", remaining),
        );
        if remaining == 0 {
            self.emit(
                LogLevel::Error,
                "quota",
                "Compression quota reached for this month!".to_string(),
            );
        }

        let mut images = list_images(self.fs.as_ref(), self.log.as_ref(), &req.folder);
        if let Some(days) = req.days {
            images = filter_by_recency(self.fs.as_ref(), self.clock.as_ref(), days, &images)?;
        }
        if images.is_empty() {
            self.emit(
                LogLevel::Info,
                "lifecycle",
                "No image has to be processed".to_string(),
            );
            return Ok(None);
        }

        let size_before = total_size(self.fs.as_ref(), &images, KIB)?;
        self.emit(
            LogLevel::Info,
            "report",
            format!(
                "{} images to compress, total size is {:.1} kb",
                images.len(),
                size_before
            ),
        );
        let remaining = processor.remaining_free_compressions()?;
        if (remaining as usize) < images.len() {
            self.emit(
                LogLevel::Warn,
                "quota",
                format!(
                    "Only {} out of {} images will be converted, since monthly quota will be reached during the compressions",
                    remaining,
                    images.len()
                ),
            );
        }

        let result = processor.run_batch(&images, req.dry_run)?;
        self.report(&result);
        match processor.remaining_free_compressions() {
            Ok(n) => self.emit(LogLevel::Info, "quota", format!("Remaining compressions: {}", n)),
            Err(e) => self.emit(
                LogLevel::Warn,
                "quota",
                format!("Could not read remaining compressions: {}", e),
            ),
        }
        Ok(Some(result))
    }

    fn report(&self, result: &BatchResult) {
        if result.errors > 0 {
            self.emit(
                LogLevel::Warn,
                "report",
                format!("{} error(s) during processing", result.errors),
            );
        } else {
            self.emit(
                LogLevel::Info,
                "report",
                "No errors during processing".to_string(),
            );
        }
        if result.skipped_for_quota > 0 {
            self.emit(
                LogLevel::Warn,
                "quota",
                format!(
                    "{} image(s) skipped because the monthly quota was reached",
                    result.skipped_for_quota
                ),
            );
        }
        if result.dry_run {
            self.emit(
                LogLevel::Info,
                "report",
                format!("Dry run: {} image(s) left untouched", result.untouched()),
            );
        }
        self.emit(
            LogLevel::Info,
            "report",
            format!(
                "Total size is {:.1} kb, {:.1}% lighter",
                result.size_after,
                result.reduction_percent()
            ),
        );
    }
}
