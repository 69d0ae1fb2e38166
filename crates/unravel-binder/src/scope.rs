//! Lexical scopes.

use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use unravel_ast::NodeIndex;

use crate::binding::BindingId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ScopeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScopeKind {
    Program,
    /// Function declarations and expressions, arrows. The body block shares
    /// the function scope.
    Function,
    Block,
    /// Catch clause; the catch body shares this scope.
    Catch,
    Class,
    /// `for`, `for-in` and `for-of` heads.
    For,
    Switch,
}

impl ScopeKind {
    /// `var` declarations hoist to the nearest scope of this kind.
    pub const fn is_var_scope(self) -> bool {
        matches!(self, ScopeKind::Program | ScopeKind::Function)
    }
}

pub type BindingTable = IndexMap<String, BindingId, FxBuildHasher>;

#[derive(Clone, Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    /// Node that opened the scope.
    pub node: NodeIndex,
    pub parent: Option<ScopeId>,
    pub children: Vec<ScopeId>,
    /// Bindings declared directly in this scope, in declaration order.
    pub bindings: BindingTable,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, node: NodeIndex, parent: Option<ScopeId>) -> Self {
        Scope {
            kind,
            node,
            parent,
            children: Vec::new(),
            bindings: BindingTable::default(),
        }
    }

    pub fn own_binding(&self, name: &str) -> Option<BindingId> {
        self.bindings.get(name).copied()
    }
}
