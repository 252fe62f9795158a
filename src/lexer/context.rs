use serde::{Deserialize, Serialize};

/// Lexical context an offset falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Context {
    /// Inside a `"..."` string literal (quotes excluded)
    StringLiteral,
    /// Inside a `\c` character literal (backslash excluded)
    CharacterLiteral,
    /// Inside a `;` line comment (semicolon excluded, newline included)
    Comment,
    /// Plain code
    Other,
}

impl Context {
    /// True for plain code, where brackets are structural
    pub fn is_code(&self) -> bool {
        matches!(self, Context::Other)
    }
}

impl std::fmt::Display for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Context::StringLiteral => "string",
            Context::CharacterLiteral => "character",
            Context::Comment => "comment",
            Context::Other => "other",
        };
        write!(f, "{}", name)
    }
}

/// A labeled half-open range `[start, end)` of byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextRange {
    /// Context of every offset in the range
    pub kind: Context,
    /// First offset inside the range
    pub start: usize,
    /// First offset past the range
    pub end: usize,
}

impl ContextRange {
    /// Creates a new context range
    pub fn new(kind: Context, start: usize, end: usize) -> Self {
        ContextRange { kind, start, end }
    }

    /// Half-open membership: `start` is inside, `end` is not
    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Number of offsets covered
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// True when the range covers no offsets (e.g. `""`)
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The range as a std range, handy for slicing
    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start..self.end
    }
}
