//! アプリ全体のテスト（Stub の圧縮サービスを注入して実行する）


use common::error::Error;
use common::ports::outbound::{Log, LogLevel, LogRecord};
use std::sync::Mutex;

/// テスト用: 受け取ったレコードを全て保持する Log
#[derive(Default)]
pub(crate) struct RecordingLog {
    records: Mutex<Vec<LogRecord>>,
}

impl RecordingLog {
    pub(crate) fn lines(&self) -> Vec<(LogLevel, String)> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .map(|r| (r.level, r.message.clone()))
            .collect()
    }

    pub(crate) fn contains(&self, level: LogLevel, needle: &str) -> bool {
        self.lines()
            .iter()
            .any(|(l, m)| *l == level && m.contains(needle))
    }
}

impl Log for RecordingLog {
    fn log(&self, record: &LogRecord) -> Result<(), Error> {
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }
}
