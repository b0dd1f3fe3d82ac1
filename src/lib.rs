/// Module for managing the source code, turning it into tokens and then into the term tree the
/// executor walks.
pub mod lang;

/// Module for the runtime and the data structures used by the executor.  As well as the executor
/// itself and the standard word library.
#[macro_use]
pub mod runtime;

pub use runtime::{
    data_structures::{
        value::{Closure, Value, format_number, format_stack},
        vocabulary::{BuiltinInfo, Definition, Vocabulary, VocabularyPtr},
    },
    error::{ErrorKind, Result, ScriptError},
    interpreter::{
        CodeManagement, Interpreter, InterpreterStack, WordManagement, executor::Executor,
    },
};
