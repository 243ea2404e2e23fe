pub mod commands;
pub mod scene;

pub use commands::*;
pub use scene::*;
