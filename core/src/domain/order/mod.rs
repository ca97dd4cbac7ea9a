pub mod entities;
pub mod ports;
pub mod quantity;

pub use entities::*;
pub use ports::*;
