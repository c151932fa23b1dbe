//! Insertion positions for queues and routes.

use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult};

/// Where to insert into an ordered sequence.
///
/// `End` appends.  `Index(i)` inserts before the element currently at `i`;
/// `Index(len)` is the same as `End`.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsertAt {
    #[default]
    End,
    Index(usize),
}

impl InsertAt {
    /// Concrete position in a sequence of length `len`.
    pub fn resolve(self, len: usize) -> ModelResult<usize> {
        match self {
            InsertAt::End => Ok(len),
            InsertAt::Index(index) if index <= len => Ok(index),
            InsertAt::Index(index) => Err(ModelError::IndexOutOfRange { index, len }),
        }
    }
}
