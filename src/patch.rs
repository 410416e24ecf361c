//! Patch descriptors
//!
//! A [`Patch`] names one point edit to an external binary: the address to
//! write at and the raw value to write there. This crate only stores and
//! round-trips descriptors; applying them to a binary is somebody else's job.
//!
//! ## JSON shape
//!
//! ```text
//! {"offset": 4096, "value": "90 90"}
//! {"offset": 4100, "value": 255}
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Raw value of a patch
///
/// The core never interprets values. Whatever the editor wrote (a string or
/// a JSON number) is kept verbatim and written back in the same form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PatchValue {
    /// Numeric value as written in the document
    Number(serde_json::Number),
    /// Textual value (hex bytes, mnemonic, ...)
    Text(String),
}

impl fmt::Display for PatchValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchValue::Number(n) => write!(f, "{}", n),
            PatchValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for PatchValue {
    fn from(value: &str) -> Self {
        PatchValue::Text(value.to_string())
    }
}

impl From<String> for PatchValue {
    fn from(value: String) -> Self {
        PatchValue::Text(value)
    }
}

impl From<i64> for PatchValue {
    fn from(value: i64) -> Self {
        PatchValue::Number(value.into())
    }
}

impl From<u64> for PatchValue {
    fn from(value: u64) -> Self {
        PatchValue::Number(value.into())
    }
}

/// One offset/value pair
///
/// Fields are private so a patch cannot change after construction. Offsets
/// are accepted as given; range checks against a target binary happen in
/// whatever applies the patch.
///
/// # Examples
///
/// ```rust
/// use mdt_workspace::Patch;
///
/// let patch = Patch::new(0x1f40, "90 90");
/// assert_eq!(patch.offset(), 0x1f40);
/// assert_eq!(patch.to_string(), "0x00001F40: 90 90");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patch {
    offset: u64,
    value: PatchValue,
}

impl Patch {
    /// Create a patch
    pub fn new(offset: u64, value: impl Into<PatchValue>) -> Self {
        Self {
            offset,
            value: value.into(),
        }
    }

    /// Address the value is written at
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Raw value to write
    pub fn value(&self) -> &PatchValue {
        &self.value
    }
}

impl fmt::Display for Patch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}: {}", self.offset, self.value)
    }
}
