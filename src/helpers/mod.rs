//! Helper functions shared by the content pipeline

mod date;
mod html;

pub use date::*;
pub use html::*;
