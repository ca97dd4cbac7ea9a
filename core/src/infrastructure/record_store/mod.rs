pub mod client;
pub mod formula;
pub mod mappers;
pub mod repositories;

pub use repositories::RecordStore;
