/// Words that manipulate the data stack.
mod stack_words;

/// Number crunching.
mod simple_arithmetic_words;

/// Words that work with comparisons, logic and Value equality.
mod math_logic_words;

/// Words that execute quotations.
mod combinator_words;

/// Words that create new words.
mod word_creation_words;

use crate::runtime::{
    built_ins::base_words::{
        combinator_words::register_combinator_words, math_logic_words::register_math_logic_words,
        simple_arithmetic_words::register_simple_arithmetic_words,
        stack_words::register_stack_words, word_creation_words::register_word_creation_words,
    },
    interpreter::Interpreter,
};

/// Called to register all of the core words of the language.
pub fn register_base_words(interpreter: &mut dyn Interpreter) {
    register_stack_words(interpreter);
    register_simple_arithmetic_words(interpreter);
    register_math_logic_words(interpreter);
    register_combinator_words(interpreter);
    register_word_creation_words(interpreter);
}
