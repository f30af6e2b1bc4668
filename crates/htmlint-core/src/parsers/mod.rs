//! HTML parsing: tokenizer and tree builder

pub mod html;
pub mod tree;

pub use tree::build_document;
