//! Locating the smallest bracketed form around a selection
//!
//! Brackets only count when they are plain code: a `(` inside a string,
//! character literal or comment is ordinary text. Unbalanced input never
//! fails; spans are clamped to the document start or end instead.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::lexer::ContextResolver;

lazy_static::lazy_static! {
    /// Opening bracket to its closing bracket
    static ref BRACKET_PAIRS: HashMap<u8, u8> =
        [(b'(', b')'), (b'[', b']'), (b'{', b'}')].into_iter().collect();
}

/// Reader-macro markers that only count directly before the opener
const ADJACENT_PREFIXES: [u8; 3] = [b'\'', b'`', b'^'];
/// Dispatch marker, absorbed even when separated from the opener (`#?@(`)
const DISPATCH_PREFIX: u8 = b'#';

fn is_closer(c: u8) -> bool {
    matches!(c, b')' | b']' | b'}')
}

/// Half-open byte span `[start, end)` of a located form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSpan {
    /// First byte of the form, including any reader-macro prefix
    pub start: usize,
    /// One past the closing bracket
    pub end: usize,
}

impl FormSpan {
    /// Creates a new span
    pub fn new(start: usize, end: usize) -> Self {
        FormSpan { start, end }
    }

    /// Length of the span in bytes
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True for a span over an empty document
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The span as a std range
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }

    /// Slice of `text` covered by the span.
    ///
    /// Falls back to an empty string when the span does not fit `text`.
    pub fn text<'t>(&self, text: &'t str) -> &'t str {
        text.get(self.as_range()).unwrap_or("")
    }
}

/// Options controlling form location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocatorOptions {
    /// Include a reader-macro prefix (`'`, `` ` ``, `^`, `#...`) in the span
    pub include_reader_prefix: bool,
}

impl Default for LocatorOptions {
    fn default() -> Self {
        LocatorOptions {
            include_reader_prefix: true,
        }
    }
}

/// Finds enclosing forms in one document.
///
/// The document is resolved once, so any number of selections can be located
/// against the same parse.
pub struct FormLocator<'a> {
    /// Document bytes
    source: &'a [u8],
    /// Contexts of the document
    resolver: ContextResolver,
    options: LocatorOptions,
}

impl<'a> FormLocator<'a> {
    /// Create a locator with default options
    pub fn new(text: &'a str) -> Self {
        Self::with_options(text, LocatorOptions::default())
    }

    /// Create a locator with explicit options
    pub fn with_options(text: &'a str, options: LocatorOptions) -> Self {
        Self {
            source: text.as_bytes(),
            resolver: ContextResolver::new(text),
            options,
        }
    }

    /// The resolver built for this document
    pub fn resolver(&self) -> &ContextResolver {
        &self.resolver
    }

    /// Locate the smallest form containing `[start, end)`.
    ///
    /// An opener sitting exactly at `start` is the enclosing form, as is a
    /// form whose closer is the last byte of the selection. Without any
    /// enclosing form the whole document is returned.
    pub fn locate(&self, start: usize, end: usize) -> Result<FormSpan> {
        let len = self.source.len();
        if start > end || end > len {
            return Err(Error::InvalidSelection { start, end, len });
        }

        // Closers seen while walking backward, with their offsets
        let mut pending: Vec<(u8, usize)> = Vec::new();
        let unclosed = self.collect_unclosed(start, end, &mut pending);

        let Some((opener, closed_at)) = self.find_enclosing_opener(start, end, &mut pending)
        else {
            tracing::debug!(start, end, "no enclosing form, using whole document");
            return Ok(FormSpan::new(0, len));
        };

        let form_start = if self.options.include_reader_prefix {
            self.absorb_prefix(opener)
        } else {
            opener
        };

        let form_end = match closed_at {
            Some(form_end) => form_end,
            None => {
                let mut expected = Vec::with_capacity(unclosed.len() + 1);
                expected.extend(BRACKET_PAIRS.get(&self.source[opener]).copied());
                // Innermost opener on top
                expected.extend(unclosed.iter().rev());
                // The opener itself may sit at `end` for an empty cursor
                self.match_forward(end.max(opener + 1), expected)
            }
        };

        let span = FormSpan::new(form_start, form_end);
        tracing::trace!(start, end, form_start, form_end, "located form");
        Ok(span)
    }

    /// Backward pass over `(start, end)`.
    ///
    /// Returns the closers owed by openers left open inside the selection,
    /// innermost first. Closers with no opener inside the selection stay in
    /// `pending` for the search before the selection.
    fn collect_unclosed(
        &self,
        start: usize,
        end: usize,
        pending: &mut Vec<(u8, usize)>,
    ) -> Vec<u8> {
        let mut unclosed = Vec::new();

        for offset in (start + 1..end).rev() {
            if !self.resolver.is_code(offset) {
                continue;
            }
            let c = self.source[offset];
            if is_closer(c) {
                pending.push((c, offset));
            } else if let Some(&closer) = BRACKET_PAIRS.get(&c) {
                if pending.pop().is_none() {
                    unclosed.push(closer);
                }
            }
        }

        unclosed
    }

    /// Backward search from `start` for the opener of the enclosing form.
    ///
    /// Returns the opener offset and, when its closer was already seen as the
    /// last byte of the selection, the end of the form.
    fn find_enclosing_opener(
        &self,
        start: usize,
        end: usize,
        pending: &mut Vec<(u8, usize)>,
    ) -> Option<(usize, Option<usize>)> {
        let from = if start < self.source.len() {
            start + 1
        } else {
            start
        };

        for offset in (0..from).rev() {
            if !self.resolver.is_code(offset) {
                continue;
            }
            let c = self.source[offset];
            if is_closer(c) {
                pending.push((c, offset));
            } else if BRACKET_PAIRS.contains_key(&c) {
                match pending.pop() {
                    None => return Some((offset, None)),
                    Some((_, closer)) if closer + 1 >= end => {
                        return Some((offset, Some(closer + 1)))
                    }
                    // A complete form before the selection
                    Some(_) => {}
                }
            }
        }

        None
    }

    /// Walk back from the opener over a reader-macro prefix
    fn absorb_prefix(&self, opener: usize) -> usize {
        for offset in (0..opener).rev() {
            if !self.resolver.is_code(offset) {
                break;
            }
            let c = self.source[offset];
            if c.is_ascii_whitespace() || is_closer(c) || BRACKET_PAIRS.contains_key(&c) {
                break;
            }
            if c == DISPATCH_PREFIX {
                return offset;
            }
            if offset + 1 == opener && ADJACENT_PREFIXES.contains(&c) {
                return offset;
            }
        }

        opener
    }

    /// Forward pass from `from` until every expected closer is seen
    fn match_forward(&self, from: usize, mut expected: Vec<u8>) -> usize {
        for offset in from..self.source.len() {
            if !self.resolver.is_code(offset) {
                continue;
            }
            let c = self.source[offset];
            if let Some(&closer) = BRACKET_PAIRS.get(&c) {
                expected.push(closer);
            } else if expected.last() == Some(&c) {
                expected.pop();
                if expected.is_empty() {
                    return offset + 1;
                }
            }
        }

        tracing::warn!(
            from,
            unmatched = expected.len(),
            "form is not closed before the document end"
        );
        self.source.len()
    }
}

/// Locate the smallest form of `text` containing `[start, end)`.
///
/// Resolves `text` on every call; use [`FormLocator`] for repeated queries.
pub fn locate_form(text: &str, start: usize, end: usize) -> Result<FormSpan> {
    FormLocator::new(text).locate(start, end)
}

/// Text of the smallest form containing `[start, end)`
pub fn current_form(text: &str, start: usize, end: usize) -> Result<&str> {
    let span = locate_form(text, start, end)?;
    Ok(span.text(text))
}
