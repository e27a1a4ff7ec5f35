//! Purpose: Define the stable public Rust API boundary for rolodex.
//! Exports: Decoder types, the parse boundary, errors, and document sources.
//! Role: Public, additive-only surface; hides internal core modules.
//! Invariants: This module is the only public path to decoder primitives.

mod source;

pub use crate::core::contact::{Contact, decode_contacts};
pub use crate::core::document::{DEFAULT_MAX_DOCUMENT_BYTES, decode_feed, parse_document};
#[doc(hidden)]
pub use crate::core::error::to_exit_code;
pub use crate::core::error::{Error, ErrorKind};
pub use source::Source;
