/// Module contains the Value enumeration and the Closure it can hold.  The value is one of the core
/// data structures of the interpreter, it is what lives on the data stack.
pub mod value;

/// The vocabulary module provides the chain of scopes words are looked up in.  Built-in words are
/// shared by a whole chain, user defined words are private to the scope they were defined in.
pub mod vocabulary;
