pub mod cache;
pub mod entities;
pub mod ports;

pub use cache::*;
pub use entities::*;
pub use ports::*;
