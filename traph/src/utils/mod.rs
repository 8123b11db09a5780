pub mod conf;
pub mod diag;
pub mod error;
pub mod lazy;
