//! # clojure-context - Lexical Contexts and Form Location for Clojure Source
//!
//! Answers two questions an editor integration asks about Clojure text,
//! without building an AST:
//!
//! - Is this offset inside a string, a character literal, a comment, or code?
//! - What is the smallest bracketed form around this selection?
//!
//! Both work on raw text and byte offsets, and both degrade gracefully on
//! malformed input: unterminated strings swallow the rest of the document,
//! unbalanced brackets clamp to the document start or end.
//!
//! ## Quick Start
//!
//! ```rust
//! use clojure_context::{Context, ContextResolver};
//!
//! let source = "(ns \"foo\") ; done\n(ns baz)";
//! let resolver = ContextResolver::new(source);
//!
//! assert_eq!(resolver.context_at(1), Context::Other);
//! assert_eq!(resolver.context_at(5), Context::StringLiteral);
//! assert_eq!(resolver.context_at(13), Context::Comment);
//! ```
//!
//! ### Locating Forms
//!
//! ```rust
//! use clojure_context::{current_form, locate_form, FormSpan};
//!
//! # fn main() -> clojure_context::Result<()> {
//! let source = "(into #{} (range 3))";
//!
//! // Cursor inside the set literal: the `#` prefix is part of the form
//! assert_eq!(current_form(source, 7, 8)?, "#{}");
//!
//! // Brackets inside strings do not count
//! let source = "(println \")\" x)";
//! assert_eq!(locate_form(source, 13, 14)?, FormSpan::new(0, 15));
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Source Text → ContextResolver → (offset → Context) → FormLocator → FormSpan
//! ```
//!
//! - [`ContextResolver`] - one forward scan, then binary-searched point queries
//! - [`FormLocator`] - bracket-aware backward and forward scans over one parse
//!
//! Offsets are byte offsets into the `&str`. A resolver is immutable; re-parse
//! by building a new one.

pub mod error;
pub mod lexer;
pub mod parser;

// Re-export main types
pub use error::{Error, Result};
pub use lexer::{classify, Context, ContextRange, ContextResolver};
pub use parser::{current_form, locate_form, FormLocator, FormSpan, LocatorOptions};

/// Type alias for the context resolver.
/// Classifies offsets of one document.
pub type Resolver = ContextResolver;

/// Type alias for the form locator.
/// Finds enclosing forms in one document.
pub type Locator<'a> = FormLocator<'a>;
