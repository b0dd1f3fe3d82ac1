use crate::{
    lang::source_buffer::{SourceBuffer, SourceLocation},
    runtime::error::{self, ErrorKind, ScriptError},
};
use lazy_static::lazy_static;
use regex::Regex;
use std::{
    fmt::{self, Debug, Display, Formatter},
    iter::FusedIterator,
};

/// The kinds of token the language knows about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// `[`, opens a quotation.
    LeftBracket,

    /// `]`, closes a quotation.
    RightBracket,

    /// An optionally signed run of digits.
    Integer,

    /// An optionally signed number with a fractional part, `1.5`, `-.5`.
    Float,

    /// A well formed double quoted string.  The token text keeps its quotes and escapes.
    String,

    /// Anything else that isn't whitespace, a bracket or a quote.
    Word,

    /// A string that opens with `"` but isn't properly closed on the same line.
    InvalidString,
}

/// A token is a simple unit of the language.  The token holds the raw text it was matched from as
/// well as the location in the original source code where it was found.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Token {
    kind: TokenKind,
    text: String,
    location: SourceLocation,
}

/// Make sure that the tokens are nicely printable for debugging purposes.
impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// Include the kind and original location when debugging.
impl Debug for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {:?} {}", self.location, self.kind, self.text)
    }
}

impl Token {
    pub fn new(kind: TokenKind, text: String, location: SourceLocation) -> Token {
        Token {
            kind,
            text,
            location,
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The exact text the token was matched from.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the token's location in the original source text.
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    pub fn line(&self) -> usize {
        self.location.line()
    }

    pub fn start(&self) -> usize {
        self.location.start()
    }

    pub fn end(&self) -> usize {
        self.location.end()
    }
}

/// A single tokenizer rule.  A rule with no kind matches text that is skipped, whitespace and
/// comments.
struct TokenRule {
    pattern: Regex,
    kind: Option<TokenKind>,
}

impl TokenRule {
    fn new(pattern: &str, kind: Option<TokenKind>) -> TokenRule {
        // Every rule is anchored to the cursor, a match further along the line isn't a match.
        let anchored = format!("^(?:{})", pattern);

        TokenRule {
            pattern: Regex::new(&anchored).unwrap_or_else(|err| {
                panic!("Invalid built-in tokenizer rule {}: {}", pattern, err)
            }),
            kind,
        }
    }

    /// Try the rule against the start of the text, returning the matched prefix.
    fn try_match<'a>(&self, text: &'a str) -> Option<&'a str> {
        self.pattern.find(text).map(|found| found.as_str())
    }
}

lazy_static! {
    /// The rules in priority order.  The first rule to match wins, regardless of how long a match a
    /// later rule could have produced.  The final word rule catches everything the earlier ones
    /// don't, so its position at the end matters.
    static ref RULES: Vec<TokenRule> = vec![
        TokenRule::new(r"\s+", None),
        TokenRule::new(r"//.*", None),
        TokenRule::new(r#""(?:[^"\\]|\\n|\\"|\\t|\\\\)*""#, Some(TokenKind::String)),
        TokenRule::new(r#"".*$"#, Some(TokenKind::InvalidString)),
        TokenRule::new(r"\[", Some(TokenKind::LeftBracket)),
        TokenRule::new(r"\]", Some(TokenKind::RightBracket)),
        TokenRule::new(r"[-+]?[0-9]*\.[0-9]+", Some(TokenKind::Float)),
        TokenRule::new(r"[-+]?[0-9]+", Some(TokenKind::Integer)),
        TokenRule::new(r#"[^\s\[\]"]+"#, Some(TokenKind::Word)),
    ];
}

/// A lazy stream of tokens over some source text.  Tokens are produced on demand, line by line.
/// The first error ends the stream, no attempt is made to recover and continue.
pub struct Tokenizer<'a> {
    buffer: SourceBuffer<'a>,
    in_line: bool,
    failed: bool,
}

impl<'a> Tokenizer<'a> {
    fn new(source: &'a str, first_line: usize) -> Tokenizer<'a> {
        Tokenizer {
            buffer: SourceBuffer::new(source, first_line),
            in_line: false,
            failed: false,
        }
    }

    /// Build the error for text no rule could match.
    fn no_match_error(&self) -> ScriptError {
        let snippet: String = self.buffer.remaining().chars().take(3).collect();
        let location = self.buffer.location();

        ScriptError::new(
            ErrorKind::NoMatchingRule,
            Some(location),
            format!("no rule matched at offset {}: '{}'", location.start(), snippet),
            None,
        )
    }
}

impl Iterator for Tokenizer<'_> {
    type Item = error::Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        loop {
            // Make sure we have something to match against, moving on through the source as lines
            // are exhausted.
            if !self.in_line || self.buffer.is_line_done() {
                if !self.buffer.next_line() {
                    return None;
                }

                self.in_line = true;
                continue;
            }

            let remaining = self.buffer.remaining();
            let found = RULES
                .iter()
                .find_map(|rule| rule.try_match(remaining).map(|text| (rule.kind, text)));

            match found {
                Some((kind, text)) => {
                    let location = self.buffer.advance(text);

                    if let Some(kind) = kind {
                        return Some(Ok(Token::new(kind, text.to_string(), location)));
                    }
                }

                None => {
                    self.failed = true;
                    return Some(Err(self.no_match_error()));
                }
            }
        }
    }
}

impl FusedIterator for Tokenizer<'_> {}

/// Tokenize the source code from a string, numbering lines from 1.
pub fn tokenize(source: &str) -> Tokenizer<'_> {
    tokenize_from_line(source, 1)
}

/// Tokenize the source code from a string, numbering lines from `first_line`.  Useful for
/// embedders that feed source in pieces but want continuous line numbers.
pub fn tokenize_from_line(source: &str, first_line: usize) -> Tokenizer<'_> {
    Tokenizer::new(source, first_line)
}
