pub mod common;
pub mod config_tests;
pub mod storage_tests;
