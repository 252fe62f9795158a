//! Lexical context resolution
//!
//! Classifies every offset of a document as string, character literal,
//! comment or plain code.

mod context;
mod context_resolver;

pub use context::{Context, ContextRange};
pub use context_resolver::{classify, ContextResolver, NAMED_CHARACTERS};
