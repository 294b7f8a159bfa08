//! Streaming scan of an html page head for artwork and catalog metadata

pub mod error;
pub mod html;
pub mod meta;
pub mod token;

pub use error::ScanError;
pub use meta::{lookup, parse_head, parse_html};
