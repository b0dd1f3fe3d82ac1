use crate::{
    add_native_word,
    runtime::{data_structures::value::Closure, error, interpreter::Interpreter},
};

/// Pop a closure from the top of the stack and execute it.
///
/// Signature: `quotation -- ...`
fn word_apply(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let closure = interpreter.pop_as_closure()?;

    interpreter.execute(&closure)
}

/// Execute a quotation with the value below it hidden away, putting it back once the quotation is
/// done.
///
/// Signature: `x quotation -- ... x`
fn word_dip(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.expect_depth(2)?;

    let closure = interpreter.pop_as_closure()?;
    let hidden = interpreter.pop()?;

    interpreter.execute(&closure)?;
    interpreter.push(hidden);

    Ok(())
}

/// Choose between 2 quotations based on a condition.  Both branches are checked to be quotations
/// before either one is run.
///
/// Signature: `condition true_quotation false_quotation -- ...`
fn word_if(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.expect_depth(3)?;

    let false_branch = interpreter.pop_as_closure()?;
    let true_branch = interpreter.pop_as_closure()?;
    let condition = interpreter.pop_as_number()?;

    let branch: &Closure = if condition != 0.0 {
        &true_branch
    } else {
        &false_branch
    };

    interpreter.execute(branch)
}

/// Signature: `condition quotation -- ...`
fn word_when(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.expect_depth(2)?;

    let closure = interpreter.pop_as_closure()?;
    let condition = interpreter.pop_as_number()?;

    if condition != 0.0 {
        interpreter.execute(&closure)?;
    }

    Ok(())
}

/// Apply 2 quotations to the same value, each one getting its own copy of it.
///
/// Signature: `x first second -- ...`
fn word_bi(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.expect_depth(3)?;

    let second = interpreter.pop_as_closure()?;
    let first = interpreter.pop_as_closure()?;
    let value = interpreter.pop()?;

    interpreter.push(value.clone());
    interpreter.execute(&first)?;

    interpreter.push(value);
    interpreter.execute(&second)
}

/// Register the words that execute quotations.
pub fn register_combinator_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "apply",
        word_apply,
        "Execute the quotation on top of the stack.",
        "quotation -- ..."
    );

    add_native_word!(
        interpreter,
        "dip",
        word_dip,
        "Execute a quotation with the value under it set aside, then restore that value.",
        "x quotation -- ... x"
    );

    add_native_word!(
        interpreter,
        "if",
        word_if,
        "Execute the first quotation if the condition is not zero, otherwise the second.",
        "condition true_quotation false_quotation -- ..."
    );

    add_native_word!(
        interpreter,
        "when",
        word_when,
        "Execute the quotation only if the condition is not zero.",
        "condition quotation -- ..."
    );

    add_native_word!(
        interpreter,
        "bi",
        word_bi,
        "Execute 2 quotations in turn, each against its own copy of the value under them.",
        "x first second -- ..."
    );
}
