pub mod cache;
pub mod storage;
