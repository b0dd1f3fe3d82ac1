use crate::{
    lang::{parsing::Quotation, source_buffer::SourceLocation},
    runtime::data_structures::vocabulary::VocabularyPtr,
};
use std::{
    fmt::{self, Debug, Display, Formatter},
    rc::Rc,
};

/// A quotation paired with the scope that was active when it was created.  This is the unit of
/// deferred execution, literal `[ ... ]` blocks and user defined words are both closures.
///
/// The body is never copied and the scope is shared with every other closure created from it.
#[derive(Clone)]
pub struct Closure {
    body: Quotation,
    scope: VocabularyPtr,
}

impl Closure {
    pub fn new(body: Quotation, scope: VocabularyPtr) -> Closure {
        Closure { body, scope }
    }

    /// The terms the closure executes.
    pub fn body(&self) -> &Quotation {
        &self.body
    }

    /// The scope words in the body are looked up in.
    pub fn scope(&self) -> &VocabularyPtr {
        &self.scope
    }

    /// Two closures are the same if they share both their body and their scope.
    pub fn ptr_eq(&self, other: &Closure) -> bool {
        self.body.ptr_eq(&other.body) && Rc::ptr_eq(&self.scope, &other.scope)
    }
}

impl Debug for Closure {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "closure {}", self.body)
    }
}

/// Core value enumeration.  Everything that can be pushed onto the data stack is one of these.
/// Values made directly from a literal remember where that literal was in the source.
#[derive(Clone)]
pub enum Value {
    /// All numbers are double precision floats.
    Number(Option<SourceLocation>, f64),

    /// A string value, represented by a Rust string.
    String(Option<SourceLocation>, String),

    /// A block of code along with its captured scope.
    Closure(Closure),
}

/// Values are compared by content, their source locations are ignored.  Closures are only equal to
/// themselves.
impl PartialEq for Value {
    fn eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Number(_, a), Value::Number(_, b)) => a == b,
            (Value::String(_, a), Value::String(_, b)) => a == b,
            (Value::Closure(a), Value::Closure(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

/// Render the value the way the `.` word prints it.  Strings are quoted, whole numbers lose their
/// fractional part and closures show as a placeholder.
impl Display for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Number(_, value) => write!(f, "{}", format_number(*value)),
            Value::String(_, value) => write!(f, "\"{}\"", value),
            Value::Closure(_) => write!(f, "[...]"),
        }
    }
}

impl Debug for Value {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match self {
            Value::Closure(closure) => write!(f, "{:?}", closure),
            _ => write!(f, "{}", self),
        }
    }
}

/// Whole numbers are shown without a trailing `.0`, everything else uses the shortest form that
/// reads back as the same value.
pub fn format_number(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{}", value)
    }
}

/// Render a whole stack, bottom first, the way the REPL and `.s` show it.
pub fn format_stack(values: &[Value]) -> String {
    let mut text = String::from("stack: <");

    for value in values {
        text.push(' ');
        text.push_str(&value.to_string());
    }

    text.push_str(" >");
    text
}

impl Value {
    /// The name of the value's type for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Number(_, _) => "number",
            Value::String(_, _) => "string",
            Value::Closure(_) => "closure",
        }
    }

    /// Where in the source the value came from, if it was made directly from a literal.
    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            Value::Number(location, _) => location.as_ref(),
            Value::String(location, _) => location.as_ref(),
            Value::Closure(_) => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Value::Number(_, _))
    }

    pub fn is_string(&self) -> bool {
        matches!(self, Value::String(_, _))
    }

    pub fn is_closure(&self) -> bool {
        matches!(self, Value::Closure(_))
    }

    /// Describe the value for an error message, including where it came from when that is known.
    pub fn describe(&self) -> String {
        match self.location() {
            Some(location) => format!("{} {} (from {})", self.type_name(), self, location),
            None => format!("{} {}", self.type_name(), self),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Value {
        Value::Number(None, value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Value {
        Value::Number(None, if value { 1.0 } else { 0.0 })
    }
}

impl From<usize> for Value {
    fn from(value: usize) -> Value {
        Value::Number(None, value as f64)
    }
}

impl From<String> for Value {
    fn from(value: String) -> Value {
        Value::String(None, value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Value {
        Value::String(None, value.to_string())
    }
}

impl From<Closure> for Value {
    fn from(closure: Closure) -> Value {
        Value::Closure(closure)
    }
}
