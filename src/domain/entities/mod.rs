//! Core domain entities.
//!
//! - [`ShortLink`] - A code → target URL mapping
//! - [`Hit`] - A single recorded redirect

pub mod hit;
pub mod short_link;

pub use hit::Hit;
pub use short_link::ShortLink;
