pub mod backend;
pub mod memory;
pub mod record_store;
