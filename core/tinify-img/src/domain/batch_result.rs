//! バッチ処理の集計結果

use super::size::reduction_percent;

/// 1 ファイル分の処理結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Compressed,
    /// 圧縮に失敗した（メッセージ付き）。バッチは続行する
    Failed(String),
    /// 月間無料枠が残っていないので圧縮しなかった
    SkippedForQuota,
    /// dry run のため何もしなかった
    Untouched,
}

/// バッチ全体の集計
///
/// dry run でなければ `compressed_ok + errors + skipped_for_quota == total`。
/// dry run では `size_after == size_before`。
#[derive(Debug, Clone, PartialEq)]
pub struct BatchResult {
    pub total: usize,
    pub compressed_ok: usize,
    pub errors: usize,
    pub skipped_for_quota: usize,
    /// KiB、小数第 1 位で切り捨て
    pub size_before: f64,
    pub size_after: f64,
    pub dry_run: bool,
}

impl BatchResult {
    pub fn new(total: usize, size_before: f64, dry_run: bool) -> Self {
        Self {
            total,
            compressed_ok: 0,
            errors: 0,
            skipped_for_quota: 0,
            size_before,
            size_after: size_before,
            dry_run,
        }
    }

    pub fn record(&mut self, outcome: &ItemOutcome) {
        match outcome {
            ItemOutcome::Compressed => self.compressed_ok += 1,
            ItemOutcome::Failed(_) => self.errors += 1,
            ItemOutcome::SkippedForQuota => self.skipped_for_quota += 1,
            ItemOutcome::Untouched => {}
        }
    }

    /// dry run で手を付けなかった件数
    pub fn untouched(&self) -> usize {
        self.total - self.compressed_ok - self.errors - self.skipped_for_quota
    }

    pub fn reduction_percent(&self) -> f64 {
        reduction_percent(self.size_before, self.size_after)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_counts_each_outcome() {
        let mut r = BatchResult::new(5, 40.0, false);
        r.record(&ItemOutcome::Compressed);
        r.record(&ItemOutcome::Compressed);
        r.record(&ItemOutcome::Failed("Decode error".to_string()));
        r.record(&ItemOutcome::SkippedForQuota);
        r.record(&ItemOutcome::SkippedForQuota);
        assert_eq!(r.compressed_ok, 2);
        assert_eq!(r.errors, 1);
        assert_eq!(r.skipped_for_quota, 2);
        assert_eq!(r.untouched(), 0);
    }

    #[test]
    fn test_untouched_in_dry_run() {
        let mut r = BatchResult::new(3, 12.5, true);
        r.record(&ItemOutcome::Untouched);
        r.record(&ItemOutcome::Untouched);
        r.record(&ItemOutcome::SkippedForQuota);
        assert_eq!(r.untouched(), 2);
        assert_eq!(r.size_after, r.size_before);
        assert_eq!(r.reduction_percent(), 0.0);
    }
}
