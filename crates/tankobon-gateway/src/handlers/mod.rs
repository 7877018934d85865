//! Upload function request handlers

pub mod service;
pub mod upload;

pub use service::*;
pub use upload::*;
