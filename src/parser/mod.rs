//! Form location
//!
//! Finds the bracketed form enclosing a selection, using the lexer's
//! contexts to ignore brackets inside strings and comments.

mod form_locator;

pub use form_locator::{current_form, locate_form, FormLocator, FormSpan, LocatorOptions};
