//! HTML format tests
//!
//! Clipboard HTML → markdown → block document.

mod paste;
