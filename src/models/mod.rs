pub mod generation;
pub mod job;

pub use generation::*;
pub use job::*;
