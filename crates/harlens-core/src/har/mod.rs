pub mod fields;
mod reader;

pub use reader::HarReader;

/// A parsed HAR document kept as a navigable JSON tree.
///
/// HAR files from browsers and capture tools routinely omit or mistype
/// fields, so the document is not bound to a strict schema. Field access goes
/// through [`fields`], which substitutes defaults instead of failing.
pub type HarDocument = serde_json::Value;
