use crate::{
    lang::{
        source_buffer::SourceLocation,
        tokenizing::{Token, TokenKind, tokenize_from_line},
    },
    runtime::error::{self, ErrorKind, ScriptError},
};
use std::{
    fmt::{self, Debug, Display, Formatter},
    mem,
    ops::Deref,
    rc::Rc,
};
use tracing::debug;

/// A node of the parsed program.  Leaves carry the location they were found at in the original
/// source, quotations carry their nested terms.
#[derive(Clone, PartialEq)]
pub enum Term {
    /// A numeric literal.  Integer and float literals both end up here as an f64.
    Number(SourceLocation, f64),

    /// A string literal with its quotes stripped and its escapes processed.
    String(SourceLocation, String),

    /// A reference to a word, looked up when it is executed.
    Word(SourceLocation, String),

    /// A bracketed block of terms that isn't executed until something applies it.
    Quotation(Quotation),
}

impl Term {
    /// The location of a leaf term.  Quotations don't have a location of their own.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Term::Number(location, _) => Some(location),
            Term::String(location, _) => Some(location),
            Term::Word(location, _) => Some(location),
            Term::Quotation(_) => None,
        }
    }

    /// Check if the term is a word with the given name.
    pub fn is_word(&self, name: &str) -> bool {
        matches!(self, Term::Word(_, word) if word == name)
    }
}

/// Render the term back into source form.  String escapes are written back out so the text can be
/// parsed again.
impl Display for Term {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Term::Number(_, value) => write!(f, "{}", value),
            Term::String(_, text) => write!(f, "\"{}\"", escape_string(text)),
            Term::Word(_, name) => write!(f, "{}", name),
            Term::Quotation(quotation) => write!(f, "{}", quotation),
        }
    }
}

impl Debug for Term {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Term::Quotation(quotation) => write!(f, "{:?}", quotation),
            _ => match self.location() {
                Some(location) => write!(f, "{}: {}", location, self),
                None => write!(f, "{}", self),
            },
        }
    }
}

/// An immutable, bracket delimited sequence of terms.  The terms are shared, so cloning a
/// quotation to build a closure never copies the tree.
#[derive(Clone, PartialEq)]
pub struct Quotation {
    items: Rc<[Term]>,
}

impl Quotation {
    pub fn new(items: Vec<Term>) -> Quotation {
        Quotation {
            items: items.into(),
        }
    }

    pub fn items(&self) -> &[Term] {
        &self.items
    }

    /// Do both quotations share the very same term list?
    pub fn ptr_eq(&self, other: &Quotation) -> bool {
        Rc::ptr_eq(&self.items, &other.items)
    }
}

/// Quotations can nest as deep as the source likes, so the tree is torn down with a work list
/// instead of letting each level drop the next one recursively.
impl Drop for Quotation {
    fn drop(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let mut pending = vec![mem::take(&mut self.items)];

        while let Some(mut items) = pending.pop() {
            // Terms still shared with another quotation are left for their last owner.
            let Some(terms) = Rc::get_mut(&mut items) else {
                continue;
            };

            for term in terms.iter_mut() {
                if let Term::Quotation(inner) = term {
                    pending.push(mem::take(&mut inner.items));
                }
            }
        }
    }
}

impl Deref for Quotation {
    type Target = [Term];

    fn deref(&self) -> &[Term] {
        &self.items
    }
}

impl Display for Quotation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "[")?;

        for term in self.items.iter() {
            write!(f, " {}", term)?;
        }

        write!(f, " ]")
    }
}

impl Debug for Quotation {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_list().entries(self.items.iter()).finish()
    }
}

/// The top level result of parsing.  It behaves just like a quotation that has no brackets around
/// it.
#[derive(Clone, PartialEq, Debug, Default)]
pub struct Program {
    items: Vec<Term>,
}

impl Program {
    pub fn items(&self) -> &[Term] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl Deref for Program {
    type Target = [Term];

    fn deref(&self) -> &[Term] {
        &self.items
    }
}

impl From<Program> for Quotation {
    fn from(program: Program) -> Quotation {
        Quotation::new(program.items)
    }
}

/// Render the program back to source, terms separated by single spaces.
impl Display for Program {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut first = true;

        for term in self.items.iter() {
            if !first {
                write!(f, " ")?;
            }

            write!(f, "{}", term)?;
            first = false;
        }

        Ok(())
    }
}

/// Keeps the stack of open contexts while parsing.  The bottom context is the program itself, one
/// more is pushed for every `[` that is still waiting for its `]`.
struct ProgramBuilder {
    /// The open contexts, innermost last.
    contexts: Vec<Vec<Term>>,

    /// The `[` tokens still waiting to be closed, kept for error reporting.
    left_brackets: Vec<Token>,
}

impl ProgramBuilder {
    fn new() -> ProgramBuilder {
        ProgramBuilder {
            contexts: vec![Vec::new()],
            left_brackets: Vec::new(),
        }
    }

    fn emit(&mut self, term: Term) {
        if let Some(context) = self.contexts.last_mut() {
            context.push(term);
        }
    }

    fn enter(&mut self, bracket: Token) {
        self.left_brackets.push(bracket);
        self.contexts.push(Vec::new());
    }

    fn leave(&mut self, bracket: &Token) -> error::Result<()> {
        if self.left_brackets.pop().is_none() {
            return syntax_error(bracket, "unexpected quotation end".to_string());
        }

        let items = self.contexts.pop().unwrap_or_default();
        self.emit(Term::Quotation(Quotation::new(items)));

        Ok(())
    }

    /// Feed one token into the builder.
    fn consume(&mut self, token: Token) -> error::Result<()> {
        match token.kind() {
            TokenKind::Integer | TokenKind::Float | TokenKind::String | TokenKind::Word => {
                let term = convert_token_to_term(&token)?;
                self.emit(term);
            }

            TokenKind::LeftBracket => self.enter(token),

            TokenKind::RightBracket => self.leave(&token)?,

            TokenKind::InvalidString => {
                return syntax_error(&token, "invalid string literal".to_string());
            }
        }

        Ok(())
    }

    /// Finish up, making sure every quotation was closed.  The innermost unclosed bracket is the
    /// one reported.
    fn program(mut self) -> error::Result<Program> {
        if let Some(bracket) = self.left_brackets.pop() {
            return syntax_error(&bracket, "quotation was not closed".to_string());
        }

        let items = self.contexts.pop().unwrap_or_default();
        Ok(Program { items })
    }
}

fn syntax_error<T>(token: &Token, message: String) -> error::Result<T> {
    ScriptError::new_as_result(ErrorKind::Syntax, Some(*token.location()), message, None)
}

/// Undo the escapes a string literal may contain.  Only `\n`, `\"`, `\t` and `\\` get past the
/// tokenizer, anything else would have made the literal invalid.
fn unescape_string(raw: &str) -> String {
    let mut text = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(next) = chars.next() {
        if next != '\\' {
            text.push(next);
            continue;
        }

        match chars.next() {
            Some('n') => text.push('\n'),
            Some('t') => text.push('\t'),
            Some(other) => text.push(other),
            None => text.push('\\'),
        }
    }

    text
}

/// The reverse of `unescape_string`, used when rendering terms back into source.
fn escape_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());

    for next in text.chars() {
        match next {
            '\n' => escaped.push_str("\\n"),
            '\t' => escaped.push_str("\\t"),
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            _ => escaped.push(next),
        }
    }

    escaped
}

/// Turn a leaf token into its term.
fn convert_token_to_term(token: &Token) -> error::Result<Term> {
    let location = *token.location();

    match token.kind() {
        TokenKind::Integer | TokenKind::Float => match token.text().parse::<f64>() {
            Ok(value) => Ok(Term::Number(location, value)),
            Err(_) => syntax_error(token, format!("invalid numeric literal '{}'", token.text())),
        },

        TokenKind::String => {
            let text = token.text();
            let inner = &text[1..text.len() - 1];

            Ok(Term::String(location, unescape_string(inner)))
        }

        TokenKind::Word => Ok(Term::Word(location, token.text().to_string())),

        _ => syntax_error(
            token,
            format!("token '{}' is not supported by parser", token.text()),
        ),
    }
}

/// Build a program from an already produced token stream.
pub fn parse_tokens<I>(tokens: I) -> error::Result<Program>
where
    I: IntoIterator<Item = error::Result<Token>>,
{
    let mut builder = ProgramBuilder::new();

    for token in tokens {
        builder.consume(token?)?;
    }

    let program = builder.program()?;
    debug!(terms = program.len(), "parsed program");

    Ok(program)
}

/// Parse the source text, numbering lines from 1.
pub fn parse(source: &str) -> error::Result<Program> {
    parse_from_line(source, 1)
}

/// Parse the source text, numbering lines from `first_line`.
pub fn parse_from_line(source: &str, first_line: usize) -> error::Result<Program> {
    parse_tokens(tokenize_from_line(source, first_line))
}
