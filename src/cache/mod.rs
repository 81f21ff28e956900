pub mod memo;

mod macros;

pub use memo::CacheKey;
pub use memo::MemoCache;
