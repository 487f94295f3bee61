//! `retail-demo` — walkthrough of listing, stocking and ordering products.

pub mod config;
pub mod walkthrough;
