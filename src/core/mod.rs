pub mod catalog;
pub mod catalog_client;
pub mod grid;
pub mod identity;
pub mod load;
pub mod normalizer;
pub mod schedule_store;
pub mod storage;
