use std::{
    fmt::{self, Display, Formatter},
    str::Lines,
};

/// The location in the source code where a token was found.  This structure is used all over the
/// interpreter to keep track where important things are found in the source code.  This is used
/// extensively in the error reporting.
///
/// This is a read-only structure.  Use the field accessor methods to get the values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceLocation {
    /// The 1 based line number in the source code where the token was found.
    line: usize,

    /// The 0 based column of the first character of the token.
    start: usize,

    /// The 0 based column of the last character of the token, inclusive.
    end: usize,
}

/// Used for error reporting to show where in the source code an error originated.  A single
/// character location is shown as `Line 1:4`, a wider one as `Line 1:4-7`.
impl Display for SourceLocation {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(formatter, "Line {}:{}", self.line, self.start)
        } else {
            write!(formatter, "Line {}:{}-{}", self.line, self.start, self.end)
        }
    }
}

impl SourceLocation {
    /// Create a new SourceLocation with all of the needed information.
    pub fn new(line: usize, start: usize, end: usize) -> SourceLocation {
        SourceLocation { line, start, end }
    }

    /// The 1 based line number in the source code.
    pub fn line(&self) -> usize {
        self.line
    }

    /// The 0 based starting column.
    pub fn start(&self) -> usize {
        self.start
    }

    /// The 0 based ending column, inclusive.
    pub fn end(&self) -> usize {
        self.end
    }
}

/// A buffer for processing source code one line at a time.  This is used by the tokenizer to match
/// its rules against the unconsumed remainder of the current line.  As text is consumed the
/// location of the cursor in that line is maintained, both as a byte offset for slicing and as a
/// character column for reporting.
///
/// The SourceBuffer only holds a reference to the source code, the code is not copied.  The source
/// code string is expected to outlive the SourceBuffer.
pub struct SourceBuffer<'a> {
    /// An iterator over the lines of the source code still to be processed.
    lines: Lines<'a>,

    /// The line currently being processed, without its line terminator.
    line: &'a str,

    /// The number reported for the current line.
    line_number: usize,

    /// The number to give the first line read.
    first_line: usize,

    /// Has the first line been read yet?
    started: bool,

    /// Byte offset of the cursor within the current line.
    offset: usize,

    /// Character column of the cursor within the current line.
    column: usize,
}

impl<'a> SourceBuffer<'a> {
    /// Create a new SourceBuffer over the source text.  The first line read is numbered
    /// `first_line`, which lets an embedder such as a REPL keep counting across inputs.
    pub fn new(source: &'a str, first_line: usize) -> Self {
        SourceBuffer {
            lines: source.lines(),
            line: "",
            line_number: first_line,
            first_line,
            started: false,
            offset: 0,
            column: 0,
        }
    }

    /// Move on to the next line of the source.  Returns false once every line has been consumed.
    pub fn next_line(&mut self) -> bool {
        match self.lines.next() {
            Some(line) => {
                self.line_number = if self.started {
                    self.line_number + 1
                } else {
                    self.first_line
                };

                self.started = true;
                self.line = line;
                self.offset = 0;
                self.column = 0;

                true
            }

            None => false,
        }
    }

    /// The unconsumed part of the current line.
    pub fn remaining(&self) -> &'a str {
        &self.line[self.offset..]
    }

    /// Has the current line been fully consumed?
    pub fn is_line_done(&self) -> bool {
        self.offset >= self.line.len()
    }

    /// Consume the given text from the front of the remaining line and return the location it
    /// covered.  The text is expected to be a prefix of `remaining()`.
    pub fn advance(&mut self, text: &str) -> SourceLocation {
        debug_assert!(self.remaining().starts_with(text));

        let width = text.chars().count();
        let location = SourceLocation::new(
            self.line_number,
            self.column,
            self.column + width.saturating_sub(1),
        );

        self.offset += text.len();
        self.column += width;

        location
    }

    /// The location of the cursor itself, a single column wide.
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line_number, self.column, self.column)
    }
}
