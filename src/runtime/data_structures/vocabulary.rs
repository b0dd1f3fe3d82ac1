use crate::runtime::{data_structures::value::Closure, interpreter::WordHandler};
use std::{
    cell::RefCell,
    collections::HashMap,
    fmt::{self, Debug, Formatter},
    rc::Rc,
};

/// Information about a native word.  Once created it's fields are read-only and accessed by member
/// methods.
#[derive(Clone)]
pub struct BuiltinInfo {
    name: String,
    description: String,
    signature: String,
    handler: Rc<WordHandler>,
}

impl BuiltinInfo {
    /// Create a new BuiltinInfo instance.
    pub fn new(
        name: String,
        description: String,
        signature: String,
        handler: Rc<WordHandler>,
    ) -> BuiltinInfo {
        BuiltinInfo {
            name,
            description,
            signature,
            handler,
        }
    }

    /// The name of the word itself.
    pub fn name(&self) -> &String {
        &self.name
    }

    /// A simple description of the word.
    pub fn description(&self) -> &String {
        &self.description
    }

    /// The stack signature of the word.
    pub fn signature(&self) -> &String {
        &self.signature
    }

    /// The handler function for the word.
    pub fn handler(&self) -> Rc<WordHandler> {
        self.handler.clone()
    }
}

impl Debug for BuiltinInfo {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{} ( {} )", self.name, self.signature)
    }
}

/// The table of native words.  One table is shared by every scope of a chain.
pub type BuiltinTable = Rc<RefCell<HashMap<String, BuiltinInfo>>>;

/// Scopes are always handled by reference, closures share the scope they were created in.
pub type VocabularyPtr = Rc<Vocabulary>;

/// What a successful lookup found.
#[derive(Clone, Debug)]
pub enum Definition {
    /// A native word.
    Builtin(BuiltinInfo),

    /// A word defined by a script with `:`.
    Closure(Closure),
}

/// One scope in a chain of scopes.  Words defined with `:` go into the scope that was active at the
/// time and are visible to that scope and every scope derived from it.  Native words live in a
/// single table that every scope of the chain shares, registering one makes it visible
/// everywhere at once.
pub struct Vocabulary {
    /// The scope this one was derived from, None for the root.
    parent: Option<VocabularyPtr>,

    /// The shared native word table.
    builtins: BuiltinTable,

    /// The words defined in this scope.
    user_defined: RefCell<HashMap<String, Closure>>,
}

impl Debug for Vocabulary {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        let mut names = self.defined_words();
        names.sort();

        f.debug_struct("Vocabulary")
            .field("has_parent", &self.parent.is_some())
            .field("user_defined", &names)
            .finish()
    }
}

impl Vocabulary {
    /// Create a new root scope with an empty native word table.
    pub fn new() -> VocabularyPtr {
        Rc::new(Vocabulary {
            parent: None,
            builtins: Rc::new(RefCell::new(HashMap::new())),
            user_defined: RefCell::new(HashMap::new()),
        })
    }

    /// Derive a new scope from this one.  The new scope sees everything this one does, shares the
    /// same native word table, and starts without any definitions of its own.
    pub fn child(self: &Rc<Self>) -> VocabularyPtr {
        Rc::new(Vocabulary {
            parent: Some(self.clone()),
            builtins: self.builtins.clone(),
            user_defined: RefCell::new(HashMap::new()),
        })
    }

    /// The scope this one was derived from.
    pub fn parent(&self) -> Option<&VocabularyPtr> {
        self.parent.as_ref()
    }

    /// Find a word.  Definitions in this scope come first, then the parent chain is searched, and
    /// only then the native words.  So a script definition always shadows a native word of the same
    /// name, and an inner definition always shadows an outer one.
    pub fn lookup(&self, name: &str) -> Option<Definition> {
        if let Some(closure) = self.lookup_user_defined(name) {
            return Some(Definition::Closure(closure));
        }

        self.builtins
            .borrow()
            .get(name)
            .cloned()
            .map(Definition::Builtin)
    }

    /// Search only the script defined words, this scope first and then up through the parents.
    pub fn lookup_user_defined(&self, name: &str) -> Option<Closure> {
        let mut scope = Some(self);

        while let Some(current) = scope {
            if let Some(closure) = current.user_defined.borrow().get(name) {
                return Some(closure.clone());
            }

            scope = current.parent.as_deref();
        }

        None
    }

    /// Define a word in this scope only.  Neither the parents nor the native words are touched.
    pub fn define(&self, name: String, closure: Closure) {
        let _ = self.user_defined.borrow_mut().insert(name, closure);
    }

    /// Register a native word.  This goes into the table shared by the whole chain, so every scope,
    /// including ones created earlier, sees it immediately.
    pub fn register_builtin(&self, info: BuiltinInfo) {
        let _ = self.builtins.borrow_mut().insert(info.name().clone(), info);
    }

    /// Is there a native word by this name?
    pub fn is_builtin(&self, name: &str) -> bool {
        self.builtins.borrow().contains_key(name)
    }

    /// The names of all the native words, sorted.
    pub fn builtin_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.builtins.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    /// All of the native words, sorted by name.
    pub fn builtins(&self) -> Vec<BuiltinInfo> {
        let mut words: Vec<BuiltinInfo> = self.builtins.borrow().values().cloned().collect();
        words.sort_by(|a, b| a.name().cmp(b.name()));
        words
    }

    /// The names of the words defined directly in this scope.
    pub fn defined_words(&self) -> Vec<String> {
        self.user_defined.borrow().keys().cloned().collect()
    }

    /// Forget every word defined directly in this scope, along with the words those definitions
    /// made in their own private scopes.  A definition's scope refers back to the scope it was
    /// defined in, so this is also what breaks those reference cycles.
    pub fn clear_definitions(&self) {
        let definitions = std::mem::take(&mut *self.user_defined.borrow_mut());

        for closure in definitions.values() {
            if !std::ptr::eq(closure.scope().as_ref(), self) {
                closure.scope().clear_definitions();
            }
        }
    }

    /// Do both scopes belong to chains that share one native word table?
    pub fn shares_builtins_with(&self, other: &Vocabulary) -> bool {
        Rc::ptr_eq(&self.builtins, &other.builtins)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lang::parsing::parse, runtime::interpreter::Interpreter};

    fn closure_in(scope: &VocabularyPtr, source: &str) -> Closure {
        Closure::new(parse(source).unwrap().into(), scope.clone())
    }

    fn builtin(name: &str) -> BuiltinInfo {
        BuiltinInfo::new(
            name.to_string(),
            String::new(),
            String::new(),
            Rc::new(|_: &mut dyn Interpreter| Ok(())),
        )
    }

    #[test]
    fn lookup_walks_up_the_chain() {
        let root = Vocabulary::new();
        let child = root.child();
        let grandchild = child.child();

        root.define("outer".to_string(), closure_in(&root, "1"));

        assert!(matches!(
            grandchild.lookup("outer"),
            Some(Definition::Closure(_))
        ));
        assert!(grandchild.lookup("missing").is_none());
    }

    #[test]
    fn definitions_stay_in_their_scope() {
        let root = Vocabulary::new();
        let child = root.child();

        child.define("local".to_string(), closure_in(&child, "1"));

        assert!(child.lookup("local").is_some());
        assert!(root.lookup("local").is_none());
        assert!(root.child().lookup("local").is_none());
    }

    #[test]
    fn inner_definition_shadows_outer() {
        let root = Vocabulary::new();
        let child = root.child();

        let outer = closure_in(&root, "1");
        let inner = closure_in(&child, "2");

        root.define("x".to_string(), outer.clone());
        child.define("x".to_string(), inner.clone());

        let Some(Definition::Closure(found)) = child.lookup("x") else {
            panic!("x should resolve to a closure");
        };
        assert!(found.ptr_eq(&inner));

        let Some(Definition::Closure(found)) = root.lookup("x") else {
            panic!("x should resolve to a closure");
        };
        assert!(found.ptr_eq(&outer));
    }

    #[test]
    fn user_words_shadow_builtins() {
        let root = Vocabulary::new();
        let child = root.child();

        root.register_builtin(builtin("dup"));
        assert!(matches!(child.lookup("dup"), Some(Definition::Builtin(_))));

        child.define("dup".to_string(), closure_in(&child, "1"));
        assert!(matches!(child.lookup("dup"), Some(Definition::Closure(_))));
        assert!(matches!(root.lookup("dup"), Some(Definition::Builtin(_))));
    }

    #[test]
    fn builtins_are_shared_by_the_whole_chain() {
        let root = Vocabulary::new();
        let early_child = root.child();
        let grandchild = early_child.child();

        // Registered through a child after the others were created, still seen by all of them.
        grandchild.register_builtin(builtin("late"));

        assert!(root.is_builtin("late"));
        assert!(early_child.is_builtin("late"));
        assert!(root.shares_builtins_with(&grandchild));
        assert!(!root.shares_builtins_with(&Vocabulary::new()));
        assert_eq!(root.builtin_names(), vec!["late".to_string()]);
    }

    #[test]
    fn clearing_definitions_only_touches_one_scope() {
        let root = Vocabulary::new();
        let child = root.child();

        root.define("a".to_string(), closure_in(&root, "1"));
        child.define("b".to_string(), closure_in(&child, "2"));

        child.clear_definitions();

        assert!(child.defined_words().is_empty());
        assert_eq!(root.defined_words(), vec!["a".to_string()]);
    }

    #[test]
    fn clearing_reaches_into_definition_scopes() {
        let root = Vocabulary::new();
        let outer_scope = root.child();
        let inner_scope = outer_scope.child();

        root.define("outer".to_string(), closure_in(&outer_scope, "inner"));
        outer_scope.define("inner".to_string(), closure_in(&inner_scope, "1"));

        root.clear_definitions();

        assert!(root.defined_words().is_empty());
        assert!(outer_scope.defined_words().is_empty());
    }
}
