use crate::{
    lang::{parsing::Term, source_buffer::SourceLocation},
    runtime::{
        data_structures::{
            value::{Closure, Value},
            vocabulary::VocabularyPtr,
        },
        error,
    },
};
use std::{
    fmt::{self, Display, Formatter},
    io::Write,
    rc::Rc,
};

pub mod executor;
pub mod term_reader;

/// A call stack item is a record of the executing word's name and the location within the original
/// source code from which it was called.  These items are read-only and the fields are accessed by
/// member functions.
#[derive(Clone, Debug, PartialEq)]
pub struct CallItem {
    location: SourceLocation,
    word: String,
}

impl CallItem {
    /// Create a new call stack item.
    pub fn new(word: String, location: SourceLocation) -> CallItem {
        CallItem { location, word }
    }

    /// Where in the source code was this word called from?
    pub fn location(&self) -> &SourceLocation {
        &self.location
    }

    /// The name of the word being executed.
    pub fn word(&self) -> &String {
        &self.word
    }
}

/// Make sure that this word can be nicely displayed to the user in event of an error.
impl Display for CallItem {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.word)
    }
}

/// Type to represent a call stack.  This is a stack of call items currently being executed by the
/// interpreter, used to give the user a trace of where an error happened.
pub type CallStack = Vec<CallItem>;

/// The data stack of values managed by the interpreter.
pub type ValueStack = Vec<Value>;

/// Trait for managing the interpreter's data stack.  Intended to be called by the native words.
pub trait InterpreterStack {
    /// Use to examine the full data stack when required.  For example the stack dump word `.s` or
    /// the repl after every line.
    fn stack(&self) -> &ValueStack;

    /// Push a script value onto the stack.  This is the primary way of sending values to words.
    fn push(&mut self, value: Value);

    /// Pop a value from the stack.  If the stack is empty a stack underflow error is returned.
    fn pop(&mut self) -> error::Result<Value>;

    /// Make sure the stack holds at least `count` values.  Words call this before popping anything
    /// so that an underflow leaves the stack untouched.
    fn expect_depth(&self, count: usize) -> error::Result<()>;

    /// Pop the top value and make sure it's a number.  The value is consumed even if it turns out
    /// to be of the wrong type.
    fn pop_as_number(&mut self) -> error::Result<f64>;

    /// Pop the top value and make sure it's a closure.  The value is consumed even if it turns out
    /// to be of the wrong type.
    fn pop_as_closure(&mut self) -> error::Result<Closure>;

    /// Drop everything on the data stack.
    fn clear_stack(&mut self);
}

/// Trait for walking and executing code.
pub trait CodeManagement {
    /// Take the next unconsumed term from the closure that is currently executing.  Words that need
    /// to read ahead of themselves, like `:`, use this to consume the terms that follow them.  Once
    /// consumed the executor won't see those terms.
    fn next_term(&mut self) -> Option<Term>;

    /// Execute a closure's body within the closure's own scope.
    fn execute(&mut self, closure: &Closure) -> error::Result<()>;

    /// Parse a block of source code and execute it in the root scope.  Line numbers start from
    /// `first_line`.
    fn process_source(&mut self, source: &str, first_line: usize) -> error::Result<()>;
}

/// Definition of a word handler function.  This is the function that is called when a native word
/// is executed.  Can be a lambda, a callable object or a Rust function.
pub type WordHandler = dyn Fn(&mut dyn Interpreter) -> error::Result<()>;

/// Simplify registering a native word with the interpreter.
///
/// Required parameters are, the interpreter instance to register with.  The name of the word to
/// register.  The word function handler to execute for the word.  A simple description of the word.
/// As well as the word's stack signature.
#[macro_export]
macro_rules! add_native_word {
    (
        $interpreter:expr ,
        $name:expr ,
        $function:expr ,
        $description:expr ,
        $signature:expr
    ) => {{
        use std::rc::Rc;

        $interpreter.add_word(
            $name.to_string(),
            Rc::new($function),
            $description.to_string(),
            $signature.to_string(),
        );
    }};
}

/// Trait for managing the words known to the interpreter and the state of the word currently
/// executing.
pub trait WordManagement {
    /// If currently set, this represents the location of the word currently executing.
    fn current_location(&self) -> &Option<SourceLocation>;

    /// The name of the word currently executing.
    fn current_word(&self) -> &str;

    /// The scope of the closure that is currently executing, or the root scope when nothing is.
    fn scope(&self) -> VocabularyPtr;

    /// The root scope of the interpreter.
    fn root(&self) -> VocabularyPtr;

    /// Register a new native word.  Native words are shared by every scope of the interpreter.
    fn add_word(
        &mut self,
        name: String,
        handler: Rc<WordHandler>,
        description: String,
        signature: String,
    );

    /// The current script execution call stack.
    fn call_stack(&self) -> &CallStack;
}

/// Core interpreter trait.
///
/// This trait brings together the traits that define the core functionality of the interpreter.
/// Managing the data stack, walking and executing code, and managing words.
pub trait Interpreter: InterpreterStack + CodeManagement + WordManagement {
    /// Where words like `.` send their output.
    fn output(&mut self) -> &mut dyn Write;

    /// Reset the interpreter, forgetting all user defined words and clearing the data stack.
    /// Native words remain registered.
    fn reset(&mut self);
}

/// Make sure there is enough room on the native stack before recursing into a closure.  User words
/// can recurse as deep as they like, the stack is grown on the heap as needed.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    /// Minimum stack space to keep available.
    const RED_ZONE: usize = 100 * 1024;

    /// Stack space to allocate when growing.
    const STACK_PER_RECURSION: usize = 1024 * 1024;

    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM manages its own stack.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
