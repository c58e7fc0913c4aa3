pub mod bench;
pub mod clause;
pub mod cnf;
pub mod error;
pub mod oracle;
pub mod search;
pub mod solve;
pub mod width;

pub use error::{Error, Result};
