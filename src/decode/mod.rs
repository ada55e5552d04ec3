//! Response decoder module
//!
//! # Overview
//!
//! Turns a JSON page document into a typed [`Page`](crate::pagination::Page).
//! A [`PageLayout`] names the dot paths of the item array and of the
//! continuation token, so one decoder serves flat resource documents
//! (`data` / `next`) and nested search groups (`results.songs.data`).

mod decoders;
mod types;

pub use decoders::JsonPageDecoder;
pub(crate) use decoders::get_path;
pub use types::{DecodeFailure, PageLayout};
