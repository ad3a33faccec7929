pub mod fields;
pub mod storage;
pub mod tab_cache;
