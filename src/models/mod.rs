//! All structured models of the command API responses

mod interface;
pub use interface::*;
