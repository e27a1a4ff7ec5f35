//! Purpose: Internal core modules backing the public API.
//! Exports: `contact` (decoder), `document` (parse boundary), `error`.
//! Invariants: Core modules prefer explicit inputs/outputs over hidden state.

pub(crate) mod contact;
pub(crate) mod document;
pub(crate) mod error;
