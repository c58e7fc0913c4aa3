use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("formula declares {num_vars} variables, fixed-width engine supports at most {max}")]
    WidthExceeded { num_vars: u32, max: u32 },

    #[error("literal {lit} is outside the declared variables 1..={num_vars}")]
    LiteralOutOfRange { lit: i64, num_vars: u32 },

    #[error("invalid partition: {0}")]
    InvalidPartition(String),

    #[error("search cancelled after {steps} steps")]
    Cancelled { steps: u64 },
}

pub type Result<T> = std::result::Result<T, Error>;
