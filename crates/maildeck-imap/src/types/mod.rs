//! Core protocol types.

mod fetch;

pub use fetch::{BodySectionFetch, FetchRequest, SectionKind};
