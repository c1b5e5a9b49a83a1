//! 月間無料枠

/// 1 か月あたりの無料圧縮回数
pub const MONTHLY_LIMIT: u32 = 500;

/// サーバーが報告した使用回数から残り回数を出す。使用回数が上限を超えていても 0 で止まる。
pub fn remaining_from_used(used: u32) -> u32 {
    MONTHLY_LIMIT.saturating_sub(used)
}
