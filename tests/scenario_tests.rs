// End to end runs through the executor, checking both what gets printed and what's left on the
// stack.

use mojito::{
    ErrorKind, Executor, Interpreter, InterpreterStack, ScriptError, Value, Vocabulary, WordManagement,
    lang::source_buffer::SourceLocation, runtime::built_ins::register_builtin_words,
};
use pretty_assertions::assert_eq;
use std::{
    cell::RefCell,
    io::{self, Write},
    rc::Rc,
};

/// An output sink the test can read back after the executor has written to it.
#[derive(Clone, Default)]
struct SharedOutput(Rc<RefCell<Vec<u8>>>);

impl SharedOutput {
    fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).to_string()
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

fn executor() -> (Executor, SharedOutput) {
    let output = SharedOutput::default();
    let mut executor = Executor::with_output(Vocabulary::new(), Box::new(output.clone()));

    register_builtin_words(&mut executor);
    (executor, output)
}

fn run_error(source: &str) -> (Executor, ScriptError) {
    let (mut executor, _) = executor();
    let error = executor.run(source).unwrap_err();

    (executor, error)
}

#[test]
fn square_prints_nine() {
    let (mut executor, output) = executor();

    executor.run(": square dup * ; 3 square .").unwrap();

    assert_eq!(output.text(), "9\n");
    assert!(executor.stack().is_empty());
}

#[test]
fn apply_prints_five() {
    let (mut executor, output) = executor();

    executor.run("[ 2 3 + ] apply .").unwrap();

    assert_eq!(output.text(), "5\n");
}

#[test]
fn nested_definition_prints_three() {
    let (mut executor, output) = executor();

    executor.run(": outer : inner 1 ; inner 2 + ; outer .").unwrap();

    assert_eq!(output.text(), "3\n");
}

#[test]
fn inner_definitions_stay_private() {
    let (mut executor, _) = executor();

    executor.run(": outer : inner 1 ; inner ; outer").unwrap();
    let error = executor.run("inner").unwrap_err();

    assert_eq!(error.kind(), ErrorKind::UnknownWord);
    assert_eq!(error.error(), "unknown word 'inner'");
}

#[test]
fn division_by_zero_consumes_operands() {
    let (executor, error) = run_error("1 0 /");

    assert_eq!(error.kind(), ErrorKind::DivisionByZero);
    assert_eq!(*error.location(), Some(SourceLocation::new(1, 4, 4)));
    assert!(executor.stack().is_empty());
}

#[test]
fn unclosed_quotation_points_at_the_bracket() {
    let (_, error) = run_error("  [1 2 3");

    assert_eq!(error.kind(), ErrorKind::Syntax);
    assert_eq!(error.to_string(), "Line 1:2: error: quotation was not closed");
}

#[test]
fn stack_state_survives_an_error() {
    let (mut executor, _) = executor();

    let _ = executor.run("1 2 3 nope 4").unwrap_err();

    assert_eq!(
        executor.stack(),
        &vec![Value::from(1.0), Value::from(2.0), Value::from(3.0)]
    );
}

#[test]
fn definitions_persist_across_runs() {
    let (mut executor, output) = executor();

    executor.run(": greet \"hello\" . ;").unwrap();
    executor.run("greet greet").unwrap();

    assert_eq!(output.text(), "\"hello\"\n\"hello\"\n");
}

#[test]
fn reset_forgets_definitions() {
    let (mut executor, _) = executor();

    executor.run(": seven 7 ; seven").unwrap();
    executor.reset();

    assert!(executor.stack().is_empty());
    assert_eq!(executor.run("seven").unwrap_err().kind(), ErrorKind::UnknownWord);
    assert_eq!(executor.run("2 dup").unwrap().len(), 2);
}

#[test]
fn printing_renders_each_kind_of_value() {
    let (mut executor, output) = executor();

    executor.run("2.5 . -4 . \"a\\tb\" . [ 1 ] . cr").unwrap();

    assert_eq!(output.text(), "2.5\n-4\n\"a\tb\"\n[...]\n\n");
}

#[test]
fn print_stack_leaves_it_alone() {
    let (mut executor, output) = executor();

    executor.run("1 \"two\" .s").unwrap();

    assert_eq!(output.text(), "stack: < 1 \"two\" >\n");
    assert_eq!(executor.stack().len(), 2);
}

#[test]
fn words_lists_the_native_words() {
    let (mut executor, output) = executor();

    executor.run("words").unwrap();

    let text = output.text();
    let names: Vec<&str> = text
        .lines()
        .filter_map(|line| line.split_whitespace().next())
        .collect();

    assert!(names.contains(&"dup"));
    assert!(names.contains(&"apply"));
    assert!(names.contains(&"words"));

    let mut sorted = names.clone();
    sorted.sort();
    assert_eq!(names, sorted);
}

#[test]
fn dup_then_drop_is_identity() {
    for source in ["1", "\"text\"", "[ 1 2 ]"] {
        let (mut executor, _) = executor();

        executor.run(source).unwrap();
        let before = executor.stack().clone();

        executor.run("dup drop").unwrap();
        assert_eq!(executor.stack(), &before);
    }
}

#[test]
fn swap_twice_is_identity() {
    let (mut executor, _) = executor();

    executor.run("1 \"b\"").unwrap();
    let before = executor.stack().clone();

    executor.run("swap swap").unwrap();
    assert_eq!(executor.stack(), &before);
}

#[test]
fn unknown_word_reports_the_call_stack() {
    let (mut executor, _) = executor();

    executor.run(": inner missing ;").unwrap();
    executor.run(": outer inner ;").unwrap();

    let error = executor.run("outer").unwrap_err();
    let words: Vec<String> = error
        .call_stack()
        .as_ref()
        .map(|stack| stack.iter().map(|item| item.word().clone()).collect())
        .unwrap_or_default();

    assert_eq!(error.error(), "unknown word 'missing'");
    assert_eq!(words, vec!["outer".to_string(), "inner".to_string()]);
}

#[test]
fn deep_recursion_does_not_overflow() {
    let (mut executor, _) = executor();

    let stack = executor
        .run(": down dup 0 > [ 1 - down ] when ; 100000 down")
        .unwrap();

    assert_eq!(stack, &vec![Value::from(0.0)]);
}

#[test]
fn quotations_see_words_defined_later() {
    let (mut executor, output) = executor();

    executor.run("[ later ] : later 11 ; apply .").unwrap();

    assert_eq!(output.text(), "11\n");
}

#[test]
fn standard_library_constructor_knows_every_word() {
    let executor = Executor::with_standard_library();

    for word in [
        "dup", "drop", "swap", "over", "rot", "depth", "clear", "+", "-", "*", "/", "mod", "<",
        ">", "=", "not", "and", "or", "apply", "dip", "if", "when", "bi", ":", ";", ".", ".s",
        "cr", "words",
    ] {
        assert!(executor.root().is_builtin(word), "missing word {}", word);
    }
}

#[test]
fn line_numbers_can_continue_a_session() {
    let (mut executor, _) = executor();

    executor.run_from_line("1 2 +", 1).unwrap();
    let error = executor.run_from_line("  oops", 2).unwrap_err();

    assert_eq!(error.to_string(), "Line 2:2-5: error: unknown word 'oops'");
}

#[test]
fn deeply_nested_quotation_is_pushed_and_dropped() {
    let (mut executor, _) = executor();
    let depth = 100_000;
    let source = format!("{}1{} drop", "[".repeat(depth), "]".repeat(depth));

    assert!(executor.run(&source).unwrap().is_empty());
}
