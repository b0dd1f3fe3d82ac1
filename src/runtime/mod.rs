/// The core data structures of the interpreter, values and the scope chain.
pub mod data_structures;

/// Module for defining the built-in native words that are available to Mojito scripts.
pub mod built_ins;

/// Module for defining the error reporting of the interpreter.
pub mod error;

/// Module for defining the core functionality of the interpreter.  This includes the traits native
/// words use to reach the interpreter's state, and the executor itself.
pub mod interpreter;
