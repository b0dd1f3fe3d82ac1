/// Module for tracking positions within the original source code.
pub mod source_buffer;

/// Module for managing the turning of the source code into a list of tokens for further processing.
pub mod tokenizing;

/// Module for turning the token stream into the nested term tree.  Brackets are the only structure
/// the language has, so this is where quotations get built.
pub mod parsing;
