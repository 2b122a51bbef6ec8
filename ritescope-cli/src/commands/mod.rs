pub mod common;
pub mod info;
pub mod ireps;
pub mod lines;
