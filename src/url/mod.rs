//! URL handling module for Contact-Harvest
//!
//! Origins arrive as loosely formatted strings (`example.com`, `https://example.com/`);
//! this module turns them into fetchable roots and composes candidate URLs from them.

mod normalize;

pub use normalize::{join_route, normalize_origin};
