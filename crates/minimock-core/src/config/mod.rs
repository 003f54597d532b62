//! Controller configuration and file loading.

pub mod controller;
pub mod error;
pub mod parser;
