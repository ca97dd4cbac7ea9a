pub mod customizer;
pub mod edits;
pub mod entities;
pub mod options;
pub mod protein;

pub use customizer::*;
pub use entities::*;
