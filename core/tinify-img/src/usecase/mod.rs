//! ユースケース層（ports 経由でのみ外界に触れる）

pub mod app;
pub mod compressor;
pub mod discovery;

pub use app::TinifyUseCase;
