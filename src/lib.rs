pub mod db;
pub mod filters;
pub mod models;
pub mod permissions;
pub mod seed;
pub mod stats;
pub mod storage;
pub mod store;
