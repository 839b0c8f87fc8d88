pub mod cache_test;
pub mod check_config;
pub mod migrate;
pub mod project;
