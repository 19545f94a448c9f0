pub mod directory;
pub mod storage;
