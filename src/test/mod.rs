//! Builders that emit RITE images byte by byte for unit tests.
//!
//! Every builder appends to a caller-supplied buffer so that 4-byte alignment is computed against
//! the final image offset, exactly as the decoder sees it. Advisory sizes are filled in correctly
//! unless overridden, so builder output passes [`crate::ParseConfig::strict`].

mod builders;

pub use builders::*;
