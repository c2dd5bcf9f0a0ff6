//! Data models for the viewer
//!
//! Tree nodes, assets and their details, list queries and pages, and the token
//! payload. Everything here is plain data; the mutation rules live in the
//! `damview-viewer` stores.

mod asset;
mod page;
mod scheme;
mod token;
mod tree;

pub use asset::*;
pub use page::*;
pub use scheme::*;
pub use token::*;
pub use tree::*;
