use super::context::{Context, ContextRange};

/// Named character literals such as `\newline`, checked in this order.
///
/// The first name that matches wins, not the longest one. New names must be
/// appended with that in mind.
pub const NAMED_CHARACTERS: [&str; 6] = [
    "newline",
    "space",
    "tab",
    "formfeed",
    "backspace",
    "return",
];

/// Characters consumed after `\u` (the `u` itself included)
const UNICODE_ESCAPE_CHARS: usize = 5;
/// Characters consumed after `\o` (the `o` itself included)
const OCTAL_ESCAPE_CHARS: usize = 4;

/// Resolves which lexical context every offset of a document is in.
///
/// The document is scanned once on construction; afterwards the resolver is
/// immutable and answers point queries with a binary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextResolver {
    /// Disjoint ranges in increasing `start` order
    ranges: Vec<ContextRange>,
    /// Length of the scanned document in bytes
    len: usize,
}

impl ContextResolver {
    /// Scans a document for strings, character literals and comments
    pub fn new(document: &str) -> Self {
        let ranges = RangeScanner::new(document).scan();

        tracing::debug!(
            len = document.len(),
            ranges = ranges.len(),
            "resolved document contexts"
        );

        ContextResolver {
            ranges,
            len: document.len(),
        }
    }

    /// Returns the context of `offset`.
    ///
    /// Offsets covered by no range, including those past the end of the
    /// document, are [`Context::Other`].
    pub fn context_at(&self, offset: usize) -> Context {
        self.range_at(offset).map_or(Context::Other, |range| range.kind)
    }

    /// True when `offset` is plain code
    pub fn is_code(&self, offset: usize) -> bool {
        self.context_at(offset).is_code()
    }

    /// Finds the recorded range containing `offset`, if any
    pub fn range_at(&self, offset: usize) -> Option<&ContextRange> {
        let mut low = 0;
        let mut high = self.ranges.len();

        while low < high {
            let pivot = low + (high - low) / 2;
            let Some(range) = self.ranges.get(pivot) else {
                tracing::error!(
                    offset,
                    pivot,
                    ranges = self.ranges.len(),
                    "context search exceeded the bounds of the range list"
                );
                return None;
            };

            if range.contains(offset) {
                return Some(range);
            } else if offset < range.start {
                high = pivot;
            } else {
                low = pivot + 1;
            }
        }

        None
    }

    /// All recorded ranges, ordered and disjoint
    pub fn ranges(&self) -> &[ContextRange] {
        &self.ranges
    }

    /// Length in bytes of the document this resolver was built from
    pub fn document_len(&self) -> usize {
        self.len
    }
}

/// Classifies a single offset of `document`.
///
/// Builds a throwaway [`ContextResolver`]; keep a resolver around when asking
/// about many offsets of the same text.
pub fn classify(document: &str, offset: usize) -> Context {
    ContextResolver::new(document).context_at(offset)
}

/// Single forward pass that records context ranges
struct RangeScanner<'a> {
    /// Source text (needed for char-aware skips)
    source: &'a str,
    /// Source bytes, scanned directly since every delimiter is ASCII
    bytes: &'a [u8],
    /// Accumulated ranges
    ranges: Vec<ContextRange>,
    /// Current position in source
    current: usize,
}

impl<'a> RangeScanner<'a> {
    fn new(source: &'a str) -> Self {
        RangeScanner {
            source,
            bytes: source.as_bytes(),
            ranges: Vec::new(),
            current: 0,
        }
    }

    fn scan(mut self) -> Vec<ContextRange> {
        while !self.is_at_end() {
            match self.advance() {
                b'\\' => self.scan_character(),
                b'"' => self.scan_string(),
                b';' => self.scan_comment(),
                _ => {}
            }
        }

        self.ranges
    }

    fn scan_character(&mut self) {
        let start = self.current;

        let end = match self.peek() {
            Some(b'u') => self.skip_chars(start, UNICODE_ESCAPE_CHARS),
            Some(b'o') => self.skip_chars(start, OCTAL_ESCAPE_CHARS),
            _ => match self.named_character_at(start) {
                Some(name) => start + name.len(),
                None => self.skip_chars(start, 1),
            },
        };

        self.current = end;
        self.add_range(Context::CharacterLiteral, start, end);
    }

    fn scan_string(&mut self) {
        let start = self.current;

        while !self.is_at_end() {
            match self.advance() {
                // The escaped byte is skipped whatever it is
                b'\\' => self.current = (self.current + 1).min(self.bytes.len()),
                b'"' => {
                    self.add_range(Context::StringLiteral, start, self.current - 1);
                    return;
                }
                _ => {}
            }
        }

        // Unterminated: the rest of the document is string
        self.add_range(Context::StringLiteral, start, self.bytes.len());
    }

    fn scan_comment(&mut self) {
        let start = self.current;

        let end = self.bytes[start..]
            .iter()
            .position(|&b| b == b'\n')
            .map_or(self.bytes.len(), |newline| start + newline + 1);

        self.current = end;
        self.add_range(Context::Comment, start, end);
    }

    fn named_character_at(&self, offset: usize) -> Option<&'static str> {
        NAMED_CHARACTERS
            .iter()
            .copied()
            .find(|name| self.bytes[offset..].starts_with(name.as_bytes()))
    }

    /// Offset after `count` whole chars starting at `from`, clamped to the end
    fn skip_chars(&self, from: usize, count: usize) -> usize {
        self.source
            .get(from..)
            .and_then(|rest| rest.char_indices().nth(count))
            .map_or(self.bytes.len(), |(skipped, _)| from + skipped)
    }

    fn add_range(&mut self, kind: Context, start: usize, end: usize) {
        // Empty literals like `""` classify nothing
        if start < end {
            self.ranges.push(ContextRange::new(kind, start, end));
        }
    }

    fn is_at_end(&self) -> bool {
        self.current >= self.bytes.len()
    }

    fn advance(&mut self) -> u8 {
        let c = self.bytes[self.current];
        self.current += 1;
        c
    }

    fn peek(&self) -> Option<u8> {
        self.bytes.get(self.current).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<(Context, usize, usize)> {
        ContextResolver::new(source)
            .ranges()
            .iter()
            .map(|r| (r.kind, r.start, r.end))
            .collect()
    }

    #[test]
    fn test_reference_fixtures() {
        let cases: [(Context, &str, usize); 14] = [
            (Context::Other, "", 0),
            (Context::Other, "(ns foo)", 2),
            (Context::StringLiteral, "(ns \"foo\")", 5),
            (Context::StringLiteral, "(ns \"f\\\"oo\")", 8),
            (Context::StringLiteral, "(ns \\; \"foo\")", 9),
            (Context::StringLiteral, "(ns \"f;oo\")", 6),
            (Context::Other, "(ns \"foo\")", 4),
            (Context::Other, "(ns \"foo\")", 9),
            (Context::Other, "(ns \"foo\");(println \"bar\")\n(ns baz)", 10),
            (Context::Comment, "(ns \"foo\");(println \"bar\")\n(ns baz)", 26),
            (Context::Other, "(ns \"foo\");(println \"bar\")\n(ns baz)", 27),
            (Context::Other, "(ns \"foo\");(println \"bar\")\n(ns baz)", 1),
            (Context::CharacterLiteral, "(ns \\;);(println \"bar\")\n(ns baz)", 5),
            (Context::CharacterLiteral, "(ns \\\");(println \"bar\")\n(ns baz)", 5),
        ];

        for (want, document, offset) in cases {
            let resolver = ContextResolver::new(document);
            assert_eq!(
                resolver.context_at(offset),
                want,
                "context_at({}) of {:?}",
                offset,
                document
            );
        }
    }

    #[test]
    fn test_string_and_comment_ranges() {
        let source = "(ns \"foo\");(println \"bar\")\n(ns baz)";
        assert_eq!(
            kinds(source),
            vec![(Context::StringLiteral, 5, 8), (Context::Comment, 11, 27)]
        );
    }

    #[test]
    fn test_character_literal_before_string() {
        let source = "(ns \\; \"foo\")";
        assert_eq!(
            kinds(source),
            vec![
                (Context::CharacterLiteral, 5, 6),
                (Context::StringLiteral, 8, 11)
            ]
        );
    }

    #[test]
    fn test_named_characters() {
        assert_eq!(
            kinds("(str \\newline)"),
            vec![(Context::CharacterLiteral, 6, 13)]
        );
        assert_eq!(kinds("\\space"), vec![(Context::CharacterLiteral, 1, 6)]);
        assert_eq!(kinds("\\return"), vec![(Context::CharacterLiteral, 1, 7)]);
        // Only a prefix of a name: a single character
        assert_eq!(kinds("\\s)"), vec![(Context::CharacterLiteral, 1, 2)]);
        // Names are matched as prefixes of the following text
        assert_eq!(kinds("\\tabx"), vec![(Context::CharacterLiteral, 1, 4)]);
    }

    #[test]
    fn test_unicode_and_octal_escapes() {
        assert_eq!(kinds("\\u0041)"), vec![(Context::CharacterLiteral, 1, 6)]);
        assert_eq!(kinds("\\o101 x"), vec![(Context::CharacterLiteral, 1, 5)]);
        // Consumed whether or not they are digits
        assert_eq!(kinds("\\u(a b)"), vec![(Context::CharacterLiteral, 1, 6)]);
        // Clamped at the document end
        assert_eq!(kinds("\\uab"), vec![(Context::CharacterLiteral, 1, 4)]);
        assert_eq!(kinds("\\o1"), vec![(Context::CharacterLiteral, 1, 3)]);
    }

    #[test]
    fn test_multibyte_character_literal() {
        let source = "\\λ)";
        assert_eq!(kinds(source), vec![(Context::CharacterLiteral, 1, 3)]);
        assert_eq!(ContextResolver::new(source).context_at(3), Context::Other);
    }

    #[test]
    fn test_backslash_at_end() {
        let resolver = ContextResolver::new("(a \\");
        assert!(resolver.ranges().is_empty());
        assert_eq!(resolver.context_at(3), Context::Other);
    }

    #[test]
    fn test_unterminated_string_swallows_rest() {
        let source = "(a \"b (c d)";
        let resolver = ContextResolver::new(source);
        assert_eq!(resolver.ranges(), &[ContextRange::new(Context::StringLiteral, 4, 11)]);
        assert_eq!(resolver.context_at(10), Context::StringLiteral);
        assert_eq!(resolver.context_at(11), Context::Other);
    }

    #[test]
    fn test_trailing_escape_in_string() {
        let source = "\"a\\\"";
        assert_eq!(kinds(source), vec![(Context::StringLiteral, 1, 4)]);
    }

    #[test]
    fn test_comment_without_newline() {
        assert_eq!(kinds("a ; hi"), vec![(Context::Comment, 3, 6)]);
    }

    #[test]
    fn test_empty_string_records_nothing() {
        let resolver = ContextResolver::new("(str \"\" x)");
        assert!(resolver.ranges().is_empty());
        assert!(resolver.is_code(5));
        assert!(resolver.is_code(6));
    }

    #[test]
    fn test_quote_inside_comment_is_comment() {
        let source = "; \"not a string\n\"yes\"";
        assert_eq!(
            kinds(source),
            vec![(Context::Comment, 1, 16), (Context::StringLiteral, 17, 20)]
        );
    }

    #[test]
    fn test_between_and_after_ranges() {
        let resolver = ContextResolver::new("\"a\" b \"c\" d");
        assert_eq!(resolver.context_at(1), Context::StringLiteral);
        assert_eq!(resolver.context_at(4), Context::Other);
        assert_eq!(resolver.context_at(7), Context::StringLiteral);
        assert_eq!(resolver.context_at(10), Context::Other);
        assert_eq!(resolver.context_at(1000), Context::Other);
        assert_eq!(resolver.range_at(7).map(|r| r.as_range()), Some(7..8));
    }

    #[test]
    fn test_classify_one_shot() {
        assert_eq!(classify("(ns \"f;oo\")", 6), Context::StringLiteral);
        assert_eq!(classify("(ns foo)", 100), Context::Other);
    }
}
