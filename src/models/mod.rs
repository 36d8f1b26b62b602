pub mod argument;
pub mod graph;
pub mod transcript;

pub use argument::*;
pub use graph::*;
pub use transcript::*;
