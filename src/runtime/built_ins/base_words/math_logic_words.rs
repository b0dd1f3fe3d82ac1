use crate::{
    add_native_word,
    runtime::{
        built_ins::base_words::simple_arithmetic_words::pop_number_operands,
        data_structures::value::Value,
        error,
        interpreter::Interpreter,
    },
};

/// Numbers are true when they are not zero.
fn is_truthy(value: f64) -> bool {
    value != 0.0
}

/// Pop two numbers, compare them and push 1 or 0.
fn comparison(interpreter: &mut dyn Interpreter, compare: fn(f64, f64) -> bool) -> error::Result<()> {
    let (a, b) = pop_number_operands(interpreter)?;

    interpreter.push(Value::from(compare(a, b)));
    Ok(())
}

fn word_less_than(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, |a, b| a < b)
}

fn word_greater_than(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, |a, b| a > b)
}

/// Values of any type can be compared, values of different types are never equal.
///
/// Signature: `a b -- a==b`
fn word_equal(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    interpreter.expect_depth(2)?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    interpreter.push(Value::from(a == b));
    Ok(())
}

fn word_not(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    let value = interpreter.pop_as_number()?;

    interpreter.push(Value::from(!is_truthy(value)));
    Ok(())
}

fn word_and(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, |a, b| is_truthy(a) && is_truthy(b))
}

fn word_or(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    comparison(interpreter, |a, b| is_truthy(a) || is_truthy(b))
}

pub fn register_math_logic_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(
        interpreter,
        "<",
        word_less_than,
        "Is a less than b?  Pushes 1 for true, 0 for false.",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        ">",
        word_greater_than,
        "Is a greater than b?  Pushes 1 for true, 0 for false.",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        "=",
        word_equal,
        "Are 2 values equal?  Quotations are only equal to themselves.",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        "not",
        word_not,
        "Logically invert a number, zero becomes 1 and everything else 0.",
        "a -- bool"
    );

    add_native_word!(
        interpreter,
        "and",
        word_and,
        "Are both numbers true?",
        "a b -- bool"
    );

    add_native_word!(
        interpreter,
        "or",
        word_or,
        "Is either number true?",
        "a b -- bool"
    );
}
