use crate::{
    add_native_word,
    runtime::{data_structures::value::format_stack, error, interpreter::Interpreter},
};

/// Pop the top value and print it on its own line.
///
/// Signature: `value -- `
fn word_print(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop()?;

    writeln!(interpreter.output(), "{}", value)?;
    Ok(())
}

/// Print the whole stack without changing it.
///
/// Signature: ` -- `
fn word_print_stack(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let text = format_stack(interpreter.stack());

    writeln!(interpreter.output(), "{}", text)?;
    Ok(())
}

fn word_newline(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    writeln!(interpreter.output())?;
    Ok(())
}

/// List the native words along with their signatures and descriptions.
///
/// Signature: ` -- `
fn word_words(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let words = interpreter.root().builtins();
    let width = words.iter().map(|word| word.name().len()).max().unwrap_or(0);

    let output = interpreter.output();

    for word in words {
        writeln!(
            output,
            "{:width$}  ( {} )  {}",
            word.name(),
            word.signature(),
            word.description(),
            width = width
        )?;
    }

    Ok(())
}

pub fn register_io_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        ".",
        word_print,
        "Pop the top value and print it.",
        "value -- "
    );

    add_native_word!(
        interpreter,
        ".s",
        word_print_stack,
        "Print the whole data stack, bottom first, without changing it.",
        " -- "
    );

    add_native_word!(interpreter, "cr", word_newline, "Print a newline.", " -- ");

    add_native_word!(
        interpreter,
        "words",
        word_words,
        "List the native words.",
        " -- "
    );
}
