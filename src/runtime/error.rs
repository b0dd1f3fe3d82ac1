use crate::{lang::source_buffer::SourceLocation, runtime::interpreter::CallStack};
use std::{
    error::Error,
    fmt::{self, Debug, Display, Formatter},
    process::{ExitCode, Termination},
};

use super::interpreter::Interpreter;

pub type Result<T> = std::result::Result<T, ScriptError>;

/// The broad class of an error.  Embedders match on this rather than on the message text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The tokenizer found text none of its rules could match.
    NoMatchingRule,

    /// The token stream does not form a valid program, unbalanced brackets or a bad string literal.
    Syntax,

    /// A word was looked up that no scope in the chain defines.
    UnknownWord,

    /// A word needed more values than the data stack held.
    StackUnderflow,

    /// A word was given the wrong kind of value, for example arithmetic on a string.
    TypeMismatch,

    /// Division or modulo with a zero divisor.
    DivisionByZero,

    /// A `:` definition without a name, or without its terminating `;`.
    MalformedDefinition,

    /// Writing to the output failed.
    Io,
}

/// Any error that occurs during the tokenizing, parsing or execution of a Mojito script.
#[derive(Clone)]
pub struct ScriptError {
    /// What class of failure this is.
    kind: ErrorKind,

    /// The location in the source code the error occurred, if available.
    location: Option<SourceLocation>,

    /// The description of the error.
    error: String,

    /// The script's call stack at the time of the error, if available.
    call_stack: Option<CallStack>,
}

impl Error for ScriptError {}

/// When returned from main, convert the error result to an operating system exit code.
impl Termination for ScriptError {
    /// Because this type represents an error, the exit code is always FAILURE.
    fn report(self) -> ExitCode {
        eprintln!("Error: {}", self);

        if let Some(call_stack) = &self.call_stack
            && !call_stack.is_empty()
        {
            eprintln!("\nCall stack");

            for item in call_stack.iter().rev() {
                eprintln!("  {}", item);
            }
        }

        ExitCode::FAILURE
    }
}

/// Print the error in the diagnostic format tools expect:
/// `Line <n>:<start>-<end>: error: <message>`.
impl Display for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match &self.location {
            Some(location) => write!(f, "{}: error: {}", location, self.error),
            None => write!(f, "error: {}", self.error),
        }
    }
}

impl Debug for ScriptError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self)
    }
}

impl ScriptError {
    /// Create a new ScriptError.
    pub fn new(
        kind: ErrorKind,
        location: Option<SourceLocation>,
        error: String,
        call_stack: Option<CallStack>,
    ) -> ScriptError {
        ScriptError {
            kind,
            location,
            error,
            call_stack,
        }
    }

    /// Create a new Script Error and wrap it in a Result::Err.
    pub fn new_as_result<T>(
        kind: ErrorKind,
        location: Option<SourceLocation>,
        error: String,
        call_stack: Option<CallStack>,
    ) -> Result<T> {
        Err(ScriptError::new(kind, location, error, call_stack))
    }

    /// What class of failure this is.
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// If available, the location in the source code the error occurred.
    pub fn location(&self) -> &Option<SourceLocation> {
        &self.location
    }

    /// The description of the error.
    pub fn error(&self) -> &String {
        &self.error
    }

    /// If available, the script's call stack at the time of the error.
    pub fn call_stack(&self) -> &Option<CallStack> {
        &self.call_stack
    }
}

/// Allow for the conversion of a std::io::Error into a ScriptError.
impl From<std::io::Error> for ScriptError {
    fn from(error: std::io::Error) -> ScriptError {
        ScriptError::new(ErrorKind::Io, None, format!("I/O error: {}", error), None)
    }
}

/// A convenience function for creating a ScriptError and wrapping in in a Result::Err using the
/// interpreter's current location and call stack.
pub fn script_error<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: String) -> Result<T> {
    let location = *interpreter.current_location();
    let call_stack = interpreter.call_stack().clone();

    ScriptError::new_as_result(kind, location, message, Some(call_stack))
}

pub fn script_error_str<T>(interpreter: &dyn Interpreter, kind: ErrorKind, message: &str) -> Result<T> {
    script_error(interpreter, kind, message.to_string())
}
