//! e3 library exports

pub mod catalog;
pub mod env;
pub mod error;
pub mod resolver;

pub use error::E3Error;
