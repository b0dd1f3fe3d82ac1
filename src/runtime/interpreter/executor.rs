use crate::{
    lang::{
        parsing::{Term, parse_from_line},
        source_buffer::SourceLocation,
    },
    runtime::{
        built_ins::register_builtin_words,
        data_structures::{
            value::{Closure, Value},
            vocabulary::{BuiltinInfo, Definition, Vocabulary, VocabularyPtr},
        },
        error::{self, ErrorKind, script_error},
        interpreter::{
            CallItem, CallStack, CodeManagement, Interpreter, InterpreterStack, ValueStack,
            WordHandler, WordManagement, ensure_sufficient_stack, term_reader::TermReader,
        },
    },
};
use std::{
    io::{self, Write},
    rc::Rc,
};
use tracing::{debug, trace};

/// One active closure.  The reader remembers how far through the body execution has got, the
/// scope is where the body's words are looked up.
struct Frame {
    reader: TermReader,
    scope: VocabularyPtr,
}

impl Frame {
    fn new(closure: &Closure) -> Frame {
        Frame {
            reader: TermReader::new(closure.body().clone()),
            scope: closure.scope().clone(),
        }
    }
}

/// The tree walking interpreter.  It owns the data stack, which outlives individual runs, and the
/// root of the scope chain that top level code is executed in.
pub struct Executor {
    /// The data stack used by the interpreter.
    stack: ValueStack,

    /// Top level code runs here and this is where native words get registered.
    root: VocabularyPtr,

    /// The closures currently executing, innermost last.
    frames: Vec<Frame>,

    /// The location of the word currently executing.
    current_location: Option<SourceLocation>,

    /// The name of the word currently executing.
    current_word: String,

    /// The call stack used to keep track of the current execution context.
    call_stack: CallStack,

    /// Where printing words send their text.
    output: Box<dyn Write>,
}

impl Interpreter for Executor {
    fn output(&mut self) -> &mut dyn Write {
        &mut *self.output
    }

    fn reset(&mut self) {
        self.stack.clear();
        self.frames.clear();
        self.call_stack.clear();
        self.current_location = None;
        self.current_word.clear();

        self.root.clear_definitions();
    }
}

impl InterpreterStack for Executor {
    fn stack(&self) -> &ValueStack {
        &self.stack
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn pop(&mut self) -> error::Result<Value> {
        match self.stack.pop() {
            Some(value) => Ok(value),
            None => self.underflow(1),
        }
    }

    fn expect_depth(&self, count: usize) -> error::Result<()> {
        if self.stack.len() < count {
            return self.underflow(count);
        }

        Ok(())
    }

    fn pop_as_number(&mut self) -> error::Result<f64> {
        match self.pop()? {
            Value::Number(_, value) => Ok(value),
            other => self.type_mismatch("a number", &other),
        }
    }

    fn pop_as_closure(&mut self) -> error::Result<Closure> {
        match self.pop()? {
            Value::Closure(closure) => Ok(closure),
            other => self.type_mismatch("a quotation", &other),
        }
    }

    fn clear_stack(&mut self) {
        self.stack.clear();
    }
}

impl CodeManagement for Executor {
    fn next_term(&mut self) -> Option<Term> {
        self.frames.last_mut()?.reader.next_term()
    }

    fn execute(&mut self, closure: &Closure) -> error::Result<()> {
        ensure_sufficient_stack(|| {
            self.frames.push(Frame::new(closure));

            let result = self.execute_frame();

            let _ = self.frames.pop();
            result
        })
    }

    fn process_source(&mut self, source: &str, first_line: usize) -> error::Result<()> {
        let program = parse_from_line(source, first_line).inspect_err(|error| {
            debug!(%error, "parsing failed");
        })?;

        self.frames.clear();
        self.call_stack.clear();

        let closure = Closure::new(program.into(), self.root.clone());

        self.execute(&closure).inspect_err(|error| {
            debug!(%error, depth = self.stack.len(), "run failed");
        })
    }
}

impl WordManagement for Executor {
    fn current_location(&self) -> &Option<SourceLocation> {
        &self.current_location
    }

    fn current_word(&self) -> &str {
        &self.current_word
    }

    fn scope(&self) -> VocabularyPtr {
        match self.frames.last() {
            Some(frame) => frame.scope.clone(),
            None => self.root.clone(),
        }
    }

    fn root(&self) -> VocabularyPtr {
        self.root.clone()
    }

    fn add_word(
        &mut self,
        name: String,
        handler: Rc<WordHandler>,
        description: String,
        signature: String,
    ) {
        self.root
            .register_builtin(BuiltinInfo::new(name, description, signature, handler));
    }

    fn call_stack(&self) -> &CallStack {
        &self.call_stack
    }
}

impl Executor {
    /// Create an executor over an existing root scope, printing to stdout.  Whatever native words
    /// the scope's chain already has are what the executor knows.
    pub fn new(root: VocabularyPtr) -> Executor {
        Executor::with_output(root, Box::new(io::stdout()))
    }

    /// Create an executor that sends its printed output to the given sink.
    pub fn with_output(root: VocabularyPtr, output: Box<dyn Write>) -> Executor {
        Executor {
            stack: Vec::with_capacity(20),
            root,
            frames: Vec::with_capacity(40),
            current_location: None,
            current_word: String::new(),
            call_stack: CallStack::with_capacity(40),
            output,
        }
    }

    /// Create an executor with a fresh root scope holding the full standard word library.
    pub fn with_standard_library() -> Executor {
        let mut executor = Executor::new(Vocabulary::new());

        register_builtin_words(&mut executor);
        executor
    }

    /// Run a block of source code, numbering its lines from 1.  On success the data stack as it now
    /// stands is returned.  On failure the stack is left exactly as the failing word left it.
    pub fn run(&mut self, source: &str) -> error::Result<&ValueStack> {
        self.run_from_line(source, 1)
    }

    /// Run a block of source code, numbering its lines from `first_line`.
    pub fn run_from_line(&mut self, source: &str, first_line: usize) -> error::Result<&ValueStack> {
        self.process_source(source, first_line)?;
        Ok(&self.stack)
    }

    /// Execute terms from the innermost frame until its reader runs dry.
    fn execute_frame(&mut self) -> error::Result<()> {
        while let Some(term) = self.next_term() {
            self.execute_term(term)?;
        }

        Ok(())
    }

    fn execute_term(&mut self, term: Term) -> error::Result<()> {
        match term {
            Term::Number(location, value) => self.push(Value::Number(Some(location), value)),

            Term::String(location, text) => self.push(Value::String(Some(location), text)),

            // A quotation literal captures the scope that is active right now.
            Term::Quotation(body) => {
                let closure = Closure::new(body, self.scope());
                self.push(Value::Closure(closure));
            }

            Term::Word(location, name) => self.execute_word(location, name)?,
        }

        Ok(())
    }

    fn execute_word(&mut self, location: SourceLocation, name: String) -> error::Result<()> {
        self.current_location = Some(location);

        trace!(word = %name, %location, depth = self.stack.len(), "executing word");

        let definition = self.scope().lookup(&name);

        let Some(definition) = definition else {
            self.current_word = name.clone();
            return script_error(self, ErrorKind::UnknownWord, format!("unknown word '{}'", name));
        };

        self.call_stack.push(CallItem::new(name.clone(), location));
        self.current_word = name;

        let result = match definition {
            Definition::Closure(closure) => self.execute(&closure),
            Definition::Builtin(info) => (info.handler())(self),
        };

        let _ = self.call_stack.pop();
        result
    }

    fn underflow<T>(&self, needed: usize) -> error::Result<T> {
        script_error(
            self,
            ErrorKind::StackUnderflow,
            format!(
                "stack underflow, '{}' needs {} value(s) but the stack holds {}",
                self.current_word,
                needed,
                self.stack.len()
            ),
        )
    }

    fn type_mismatch<T>(&self, expected: &str, found: &Value) -> error::Result<T> {
        script_error(
            self,
            ErrorKind::TypeMismatch,
            format!(
                "'{}' expected {}, found {}",
                self.current_word,
                expected,
                found.describe()
            ),
        )
    }
}

/// Word definitions refer back to the scopes they were defined in.  Break those cycles so the whole
/// scope tree is freed along with the executor.
impl Drop for Executor {
    fn drop(&mut self) {
        self.root.clear_definitions();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::add_native_word;
    use pretty_assertions::assert_eq;

    #[test]
    fn literals_keep_their_location() {
        let mut executor = Executor::with_output(Vocabulary::new(), Box::new(io::sink()));
        let stack = executor.run("  42").unwrap();

        assert_eq!(stack[0].location(), Some(&SourceLocation::new(1, 2, 3)));
    }

    #[test]
    fn quotation_captures_the_active_scope() {
        let root = Vocabulary::new();
        let mut executor = Executor::with_output(root.clone(), Box::new(io::sink()));

        executor.run("[ 1 ]").unwrap();

        let Value::Closure(closure) = executor.pop().unwrap() else {
            panic!("expected a closure on the stack");
        };
        assert!(Rc::ptr_eq(closure.scope(), &root));
    }

    #[test]
    fn unknown_word_names_the_word() {
        let mut executor = Executor::with_output(Vocabulary::new(), Box::new(io::sink()));
        let error = executor.run("1 frobnicate").unwrap_err();

        assert_eq!(error.kind(), ErrorKind::UnknownWord);
        assert_eq!(
            error.to_string(),
            "Line 1:2-11: error: unknown word 'frobnicate'"
        );
        assert_eq!(executor.stack().len(), 1);
    }

    #[test]
    fn first_line_is_injectable() {
        let mut executor = Executor::with_output(Vocabulary::new(), Box::new(io::sink()));
        let error = executor.run_from_line("nope", 7).unwrap_err();

        assert_eq!(*error.location(), Some(SourceLocation::new(7, 0, 3)));
    }

    #[test]
    fn native_words_see_the_interpreter() {
        let mut executor = Executor::with_output(Vocabulary::new(), Box::new(io::sink()));

        add_native_word!(
            executor,
            "answer",
            |interpreter: &mut dyn Interpreter| {
                interpreter.push(Value::from(42.0));
                Ok(())
            },
            "Push the answer.",
            " -- 42"
        );

        assert_eq!(executor.run("answer").unwrap(), &vec![Value::from(42.0)]);
        assert!(executor.root().is_builtin("answer"));
    }

    #[test]
    fn reader_is_shared_with_native_words() {
        let mut executor = Executor::with_output(Vocabulary::new(), Box::new(io::sink()));

        // A word that swallows the term that follows it.
        add_native_word!(
            executor,
            "skip",
            |interpreter: &mut dyn Interpreter| {
                let _ = interpreter.next_term();
                Ok(())
            },
            "Skip the next term.",
            " -- "
        );

        assert_eq!(
            executor.run("1 skip 2 3").unwrap(),
            &vec![Value::from(1.0), Value::from(3.0)]
        );
    }

    #[test]
    fn stack_persists_between_runs() {
        let mut executor = Executor::with_output(Vocabulary::new(), Box::new(io::sink()));

        executor.run("1").unwrap();
        executor.run("2").unwrap();

        assert_eq!(executor.stack().len(), 2);

        executor.clear_stack();
        assert!(executor.stack().is_empty());
    }
}
