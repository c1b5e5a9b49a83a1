//! Ports & Adapters のポート定義
//!
//! - inbound: main/cli がアプリを呼び出す trait
//! - outbound: アプリが圧縮サービスに依頼するための trait（FS・時刻・ログは common）

pub mod inbound;
pub mod outbound;
