use crate::{
    add_native_word,
    lang::parsing::{Quotation, Term},
    runtime::{
        data_structures::value::Closure,
        error::{self, ErrorKind, script_error, script_error_str},
        interpreter::Interpreter,
    },
};
use tracing::debug;

/// Read the name of the word being defined.
fn definition_name(interpreter: &mut dyn Interpreter) -> error::Result<String> {
    match interpreter.next_term() {
        Some(Term::Word(_, name)) => Ok(name),

        Some(other) => script_error(
            interpreter,
            ErrorKind::MalformedDefinition,
            format!("the name of a new word must be a word, found '{}'", other),
        ),

        None => script_error_str(
            interpreter,
            ErrorKind::MalformedDefinition,
            "':' is missing the name of the new word",
        ),
    }
}

/// Consume terms up to the `;` that closes this definition.  Definitions can nest, an inner `:`
/// needs its own `;` before the outer one can end, and the inner definition is kept in the body
/// as is.
fn definition_body(interpreter: &mut dyn Interpreter, name: &str) -> error::Result<Vec<Term>> {
    let mut body = Vec::new();
    let mut depth = 0usize;

    loop {
        let Some(term) = interpreter.next_term() else {
            return script_error(
                interpreter,
                ErrorKind::MalformedDefinition,
                format!("definition of '{}' is missing its terminating ';'", name),
            );
        };

        if term.is_word(":") {
            depth += 1;
        } else if term.is_word(";") {
            if depth == 0 {
                break;
            }

            depth -= 1;
        }

        body.push(term);
    }

    Ok(body)
}

/// Define a new word.  The body becomes a closure over a new scope derived from the one the
/// definition was made in, so words the body defines stay private to it.
///
/// Signature: ` -- `
fn word_start_word(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let name = definition_name(interpreter)?;
    let body = definition_body(interpreter, &name)?;

    let scope = interpreter.scope();
    let terms = body.len();
    let closure = Closure::new(Quotation::new(body), scope.child());

    scope.define(name.clone(), closure);

    debug!(word = %name, terms, "defined word");
    Ok(())
}

/// Only ever reached when a `;` turns up outside of a definition.
fn word_end_word(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    script_error_str(
        interpreter,
        ErrorKind::MalformedDefinition,
        "';' without a matching ':'",
    )
}

pub fn register_word_creation_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        ":",
        word_start_word,
        "Start a new word definition, ending at the matching ;",
        " -- "
    );

    add_native_word!(
        interpreter,
        ";",
        word_end_word,
        "End a word definition.",
        " -- "
    );
}
