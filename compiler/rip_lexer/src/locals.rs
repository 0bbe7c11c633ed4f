//! Local variable scopes.
//!
//! The lexer needs to know whether a bare identifier is a local variable:
//! `x -1` is a subtraction when `x` is a local and a method call with a
//! negative argument otherwise. The grammar driver declares names as it
//! reduces assignments and parameters; the lexer only asks.

use rustc_hash::FxHashSet;

#[derive(Clone, Debug, Default)]
struct Scope {
    names: FxHashSet<String>,
    /// Blocks see the enclosing scope's locals; `def`/`class` bodies do not.
    inherits: bool,
}

/// Stack of local-variable scopes, innermost last.
#[derive(Clone, Debug)]
pub struct LocalScopes {
    scopes: Vec<Scope>,
}

impl Default for LocalScopes {
    fn default() -> Self {
        Self::new()
    }
}

impl LocalScopes {
    pub fn new() -> Self {
        LocalScopes {
            scopes: vec![Scope::default()],
        }
    }

    /// Open a scope. `inherits` is true for blocks and lambdas.
    pub fn push_scope(&mut self, inherits: bool) {
        self.scopes.push(Scope {
            names: FxHashSet::default(),
            inherits,
        });
    }

    /// Close the innermost scope. The top-level scope is never popped.
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn declare(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            if !scope.names.contains(name) {
                scope.names.insert(name.to_owned());
            }
        }
    }

    /// Declared in the innermost scope itself.
    pub fn is_declared_here(&self, name: &str) -> bool {
        self.scopes.last().is_some_and(|scope| scope.names.contains(name))
    }

    /// Visible from the innermost scope.
    pub fn is_local(&self, name: &str) -> bool {
        for scope in self.scopes.iter().rev() {
            if scope.names.contains(name) {
                return true;
            }
            if !scope.inherits {
                break;
            }
        }
        false
    }

    /// True if declaring `name` in the innermost scope would hide a
    /// visible local of an enclosing scope. Names starting with `_` never
    /// shadow.
    pub fn shadows_outer(&self, name: &str) -> bool {
        if name.starts_with('_') {
            return false;
        }
        let mut scopes = self.scopes.iter().rev();
        let Some(inner) = scopes.next() else {
            return false;
        };
        if !inner.inherits {
            return false;
        }
        for scope in scopes {
            if scope.names.contains(name) {
                return true;
            }
            if !scope.inherits {
                break;
            }
        }
        false
    }
}
