pub mod bits;
pub mod store;
pub mod word;

pub use bits::{BitClause, Counter};
pub use store::ClauseStore;
pub use word::BitWord;
