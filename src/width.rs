use crate::clause::word::BitWord;
use crate::error::{Error, Result};

// variable v lives at bit N - v, bit N is the overflow sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Width {
    num_vars: u32,
}

impl Width {
    pub fn new(num_vars: u32) -> Self {
        Self { num_vars }
    }

    pub fn for_word<W: BitWord>(num_vars: u32) -> Result<Self> {
        match W::MAX_VARS {
            Some(max) if num_vars > max => Err(Error::WidthExceeded { num_vars, max }),
            _ => Ok(Self::new(num_vars)),
        }
    }

    pub fn num_vars(self) -> u32 {
        self.num_vars
    }

    pub fn bit_of(self, var: u32) -> u32 {
        debug_assert!(var >= 1 && var <= self.num_vars, "variable {var} out of range");
        self.num_vars - var
    }

    pub fn var_at(self, pos: u32) -> u32 {
        self.num_vars - pos
    }

    pub fn counter_bits(self) -> u32 {
        self.num_vars + 1
    }
}
