//! 人間向けログ実装（`[LEVEL] message` を stderr に 1 行ずつ出力）
//!
//! fields は出さず message のみ。fields が必要なら FileJsonLog を併用する。

use crate::error::Error;
use crate::ports::outbound::{Log, LogLevel, LogRecord};
use std::io::Write;
use std::sync::Mutex;

/// 人間向けログ（max_level より冗長なレコードは捨てる）
pub struct StderrLog {
    max_level: LogLevel,
    out: Mutex<Box<dyn Write + Send>>,
}

impl StderrLog {
    /// verbose なら Debug まで、そうでなければ Info まで出す
    pub fn new(verbose: bool) -> Self {
        let max_level = if verbose { LogLevel::Debug } else { LogLevel::Info };
        Self::with_writer(max_level, Box::new(std::io::stderr()))
    }

    pub fn with_writer(max_level: LogLevel, out: Box<dyn Write + Send>) -> Self {
        Self {
            max_level,
            out: Mutex::new(out),
        }
    }

    pub fn max_level(&self) -> LogLevel {
        self.max_level
    }
}

/// `[INFO] message` 形式に整形する
pub fn format_line(record: &LogRecord) -> String {
    format!("[{}] {}", record.level.label(), record.message)
}

impl Log for StderrLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        if record.level > self.max_level {
            return Ok(());
        }
        let mut out = self
            .out
            .lock()
            .map_err(|_| Error::io_msg("log writer lock poisoned"))?;
        writeln!(out, "{}", format_line(record)).map_err(|e| Error::io_msg(e.to_string()))?;
        out.flush().map_err(|e| Error::io_msg(e.to_string()))
    }
}
