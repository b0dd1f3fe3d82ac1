use crate::{
    add_native_word,
    runtime::{
        data_structures::value::Value,
        error::{self, ErrorKind, script_error},
        interpreter::Interpreter,
    },
};

/// Pop the two operands of a binary numeric word.  The depth is checked first, then both values
/// are consumed, and only then are their types checked.
pub(crate) fn pop_number_operands(interpreter: &mut dyn Interpreter) -> error::Result<(f64, f64)> {
    interpreter.expect_depth(2)?;

    let b = interpreter.pop()?;
    let a = interpreter.pop()?;

    match (a, b) {
        (Value::Number(_, a), Value::Number(_, b)) => Ok((a, b)),
        (a, b) => {
            let culprit = if a.is_number() { b } else { a };

            script_error(
                interpreter,
                ErrorKind::TypeMismatch,
                format!(
                    "'{}' expected two numbers, found {}",
                    interpreter.current_word(),
                    culprit.describe()
                ),
            )
        }
    }
}

/// Pop two numbers, apply the operation and push the result.
fn binary_math(
    interpreter: &mut dyn Interpreter,
    operation: fn(f64, f64) -> f64,
) -> error::Result<()> {
    let (a, b) = pop_number_operands(interpreter)?;

    interpreter.push(Value::from(operation(a, b)));
    Ok(())
}

/// Same as binary_math, but a zero divisor is an error rather than an infinity or NaN.
fn checked_division(
    interpreter: &mut dyn Interpreter,
    operation: fn(f64, f64) -> f64,
) -> error::Result<()> {
    let (a, b) = pop_number_operands(interpreter)?;

    if b == 0.0 {
        return script_error(
            interpreter,
            ErrorKind::DivisionByZero,
            format!("division by zero in '{}'", interpreter.current_word()),
        );
    }

    interpreter.push(Value::from(operation(a, b)));
    Ok(())
}

fn word_add(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_math(interpreter, |a, b| a + b)
}

fn word_subtract(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_math(interpreter, |a, b| a - b)
}

fn word_multiply(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    binary_math(interpreter, |a, b| a * b)
}

fn word_divide(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    checked_division(interpreter, |a, b| a / b)
}

/// The remainder follows the sign of the dividend, `-7 2 mod` is `-1`.
fn word_mod(interpreter: &mut dyn Interpreter) -> error::Result<()> {
    checked_division(interpreter, |a, b| a % b)
}

pub fn register_simple_arithmetic_words(interpreter: &mut dyn Interpreter) {
    add_native_word!(interpreter, "+", word_add, "Add 2 numbers.", "a b -- result");

    add_native_word!(
        interpreter,
        "-",
        word_subtract,
        "Subtract 2 numbers.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "*",
        word_multiply,
        "Multiply 2 numbers.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "/",
        word_divide,
        "Divide 2 numbers, failing when the divisor is zero.",
        "a b -- result"
    );

    add_native_word!(
        interpreter,
        "mod",
        word_mod,
        "Remainder of dividing 2 numbers, failing when the divisor is zero.",
        "a b -- remainder"
    );
}
