// Parameterized word tests using test-case.  Each case seeds the stack, runs a line of code and
// checks what is left behind.

use mojito::{
    ErrorKind, Executor, InterpreterStack, Result, Value, Vocabulary,
    runtime::built_ins::register_builtin_words,
};
use std::io::sink;
use test_case::test_case;

fn executor() -> Executor {
    // Keep the printing words quiet, these cases only look at the stack.
    let mut executor = Executor::with_output(Vocabulary::new(), Box::new(sink()));

    register_builtin_words(&mut executor);
    executor
}

fn eval_and_stack(code: &str, init_stack: &[f64]) -> Result<Vec<f64>> {
    let mut executor = executor();

    for &value in init_stack {
        executor.push(Value::from(value));
    }

    let stack = executor.run(code)?;

    Ok(stack
        .iter()
        .map(|value| match value {
            Value::Number(_, number) => *number,
            other => panic!("expected only numbers on the stack, found {:?}", other),
        })
        .collect())
}

fn eval_error(code: &str, init_stack: &[f64]) -> (ErrorKind, usize) {
    let mut executor = executor();

    for &value in init_stack {
        executor.push(Value::from(value));
    }

    let error = executor.run(code).unwrap_err();
    (error.kind(), executor.stack().len())
}

#[test_case("0", &[], &[0.0]; "zero")]
#[test_case("42", &[], &[42.0]; "number")]
#[test_case("-2.5", &[], &[-2.5]; "negative float")]
#[test_case("+", &[2.0, 2.0], &[4.0]; "simple add")]
#[test_case("-", &[5.0, 2.0], &[3.0]; "simple sub")]
#[test_case("*", &[3.0, 4.0], &[12.0]; "simple mul")]
#[test_case("/", &[12.0, 3.0], &[4.0]; "simple div")]
#[test_case("/", &[1.0, 4.0], &[0.25]; "fractional div")]
#[test_case("mod", &[13.0, 5.0], &[3.0]; "simple mod")]
#[test_case("mod", &[-7.0, 2.0], &[-1.0]; "mod follows the dividend")]
#[test_case("mod", &[5.5, 2.0], &[1.5]; "float mod")]
#[test_case("dup", &[1.0], &[1.0, 1.0]; "dup")]
#[test_case("drop", &[1.0, 2.0], &[1.0]; "drop")]
#[test_case("swap", &[1.0, 2.0], &[2.0, 1.0]; "swap")]
#[test_case("over", &[1.0, 2.0], &[1.0, 2.0, 1.0]; "over")]
#[test_case("rot", &[1.0, 2.0, 3.0], &[2.0, 3.0, 1.0]; "rot")]
#[test_case("depth", &[7.0, 8.0], &[7.0, 8.0, 2.0]; "depth")]
#[test_case("clear", &[1.0, 2.0, 3.0], &[]; "clear")]
#[test_case("<", &[1.0, 2.0], &[1.0]; "less is true")]
#[test_case("<", &[2.0, 1.0], &[0.0]; "less is false")]
#[test_case("<", &[1.0, 1.0], &[0.0]; "less for equal")]
#[test_case(">", &[2.0, 1.0], &[1.0]; "greater is true")]
#[test_case(">", &[1.0, 2.0], &[0.0]; "greater is false")]
#[test_case("=", &[3.0, 3.0], &[1.0]; "equal numbers")]
#[test_case("=", &[3.0, 4.0], &[0.0]; "unequal numbers")]
#[test_case("\"a\" \"a\" =", &[], &[1.0]; "equal strings")]
#[test_case("\"3\" 3 =", &[], &[0.0]; "string never equals number")]
#[test_case("not", &[0.0], &[1.0]; "not of zero")]
#[test_case("not", &[5.0], &[0.0]; "not of non zero")]
#[test_case("and", &[1.0, 2.0], &[1.0]; "and for true true")]
#[test_case("and", &[1.0, 0.0], &[0.0]; "and for true false")]
#[test_case("or", &[0.0, 0.0], &[0.0]; "or for false false")]
#[test_case("or", &[0.0, -1.0], &[1.0]; "or for false true")]
#[test_case("[ 2 3 + ] apply", &[], &[5.0]; "apply")]
#[test_case("[ 10 * ] dip", &[1.0, 2.0], &[10.0, 2.0]; "dip hides the value")]
#[test_case("[ 1 ] [ 2 ] if", &[1.0], &[1.0]; "if true branch")]
#[test_case("[ 1 ] [ 2 ] if", &[0.0], &[2.0]; "if false branch")]
#[test_case("[ 1 ] when", &[-3.0], &[1.0]; "when runs on true")]
#[test_case("[ 1 ] when", &[0.0], &[]; "when skips on false")]
#[test_case("[ 1 + ] [ 2 * ] bi", &[5.0], &[6.0, 10.0]; "bi copies the value")]
#[test_case(": double 2 * ; 4 double", &[], &[8.0]; "define and call")]
#[test_case(": dup 7 ; dup", &[1.0], &[1.0, 7.0]; "user word shadows builtin")]
#[test_case(": f 1 ; : f 2 ; f", &[], &[2.0]; "redefinition replaces")]
#[test_case(": outer : inner 1 ; inner 2 + ; outer", &[], &[3.0]; "nested definition")]
#[test_case(": empty ; empty", &[], &[]; "empty definition")]
#[test_case(": count dup 0 > [ 1 - count ] when ; 5 count", &[], &[0.0]; "recursion")]
#[test_case("// just a comment", &[1.0], &[1.0]; "comment only")]
fn word_cases(code: &str, init_stack: &[f64], expected: &[f64]) {
    assert_eq!(eval_and_stack(code, init_stack).unwrap(), expected);
}

#[test_case("dup", &[], ErrorKind::StackUnderflow, 0; "dup on empty stack")]
#[test_case("drop", &[], ErrorKind::StackUnderflow, 0; "drop on empty stack")]
#[test_case("swap", &[1.0], ErrorKind::StackUnderflow, 1; "swap with one value")]
#[test_case("over", &[1.0], ErrorKind::StackUnderflow, 1; "over with one value")]
#[test_case("rot", &[1.0, 2.0], ErrorKind::StackUnderflow, 2; "rot with two values")]
#[test_case("+", &[1.0], ErrorKind::StackUnderflow, 1; "add with one value")]
#[test_case("if", &[1.0, 2.0], ErrorKind::StackUnderflow, 2; "if with two values")]
#[test_case("/", &[1.0, 0.0], ErrorKind::DivisionByZero, 0; "division by zero")]
#[test_case("mod", &[1.0, 0.0], ErrorKind::DivisionByZero, 0; "mod by zero")]
#[test_case("\"a\" 1 +", &[], ErrorKind::TypeMismatch, 0; "add a string")]
#[test_case("1 apply", &[], ErrorKind::TypeMismatch, 0; "apply a number")]
#[test_case("apply", &[], ErrorKind::StackUnderflow, 0; "apply on empty stack")]
#[test_case("[ 1 ] bi", &[], ErrorKind::StackUnderflow, 1; "bi with one value")]
#[test_case("5 [ 1 ] 2 bi", &[], ErrorKind::TypeMismatch, 2; "bi a number")]
#[test_case("[ + ] dip", &[1.0, 2.0], ErrorKind::StackUnderflow, 1; "dip body underflows")]
#[test_case("5 1 dip", &[], ErrorKind::TypeMismatch, 1; "dip a number")]
#[test_case("1 2 [ 3 ] if", &[], ErrorKind::TypeMismatch, 1; "if with a number branch")]
#[test_case("\"yes\" [ 1 ] when", &[], ErrorKind::TypeMismatch, 0; "when with a string condition")]
#[test_case("nope", &[1.0], ErrorKind::UnknownWord, 1; "unknown word")]
#[test_case(":", &[], ErrorKind::MalformedDefinition, 0; "definition without a name")]
#[test_case(": 5 ;", &[], ErrorKind::MalformedDefinition, 0; "number as a name")]
#[test_case(": f 1 2", &[], ErrorKind::MalformedDefinition, 0; "definition without an end")]
#[test_case(": f : g ;", &[], ErrorKind::MalformedDefinition, 0; "nested definition without an end")]
#[test_case(";", &[], ErrorKind::MalformedDefinition, 0; "end without a start")]
#[test_case("[ 1 2", &[], ErrorKind::Syntax, 0; "unclosed quotation")]
#[test_case("1 ]", &[], ErrorKind::Syntax, 0; "unexpected quotation end")]
#[test_case("\"open", &[], ErrorKind::Syntax, 0; "unterminated string")]
fn error_cases(code: &str, init_stack: &[f64], kind: ErrorKind, depth_after: usize) {
    assert_eq!(eval_error(code, init_stack), (kind, depth_after));
}
