//! サイズ表示の丸め（四捨五入ではなく小数第 1 位で切り捨て）

pub fn truncate_one_decimal(value: f64) -> f64 {
    (value * 10.0).trunc() / 10.0
}

/// 圧縮前後のサイズから削減率（%）を出す。圧縮前が 0 なら 0.0
pub fn reduction_percent(before: f64, after: f64) -> f64 {
    if before <= 0.0 {
        return 0.0;
    }
    truncate_one_decimal(100.0 * (1.0 - after / before))
}
