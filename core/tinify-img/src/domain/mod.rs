//! tinify-img 固有のドメイン型（型と不変条件）

pub mod api_key;
pub mod batch_result;
pub mod command;
pub mod image_set;
pub mod quota;
pub mod size;

pub use api_key::ApiKey;
pub use batch_result::{BatchResult, ItemOutcome};
pub use command::{CompressRequest, TinifyCommand};
pub use image_set::ImageSet;
pub use quota::remaining_from_used;
pub use size::truncate_one_decimal;
