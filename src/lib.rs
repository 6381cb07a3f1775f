pub mod backend;
pub mod key;
pub mod key_size;
pub mod lifecycle;
pub mod naming;
pub mod parameters;
pub mod persistence;
pub mod report;
pub mod secret_store;
