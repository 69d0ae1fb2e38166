//! Bindings and their reference sites.

use smallvec::SmallVec;
use unravel_ast::NodeIndex;

use crate::scope::ScopeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BindingId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BindingKind {
    Var,
    Let,
    Const,
    Function,
    Class,
    Param,
    Catch,
    Import,
}

impl BindingKind {
    pub const fn is_lexical(self) -> bool {
        matches!(
            self,
            BindingKind::Let | BindingKind::Const | BindingKind::Class
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReferenceKind {
    Read,
    /// Plain assignment target, `for-in/of` left side.
    Write,
    /// Compound assignment target, update operand.
    ReadWrite,
    /// `export` declaration or `export { x }` specifier.
    Export,
}

impl ReferenceKind {
    #[inline]
    pub const fn reads(self) -> bool {
        !matches!(self, ReferenceKind::Write)
    }

    #[inline]
    pub const fn writes(self) -> bool {
        matches!(self, ReferenceKind::Write | ReferenceKind::ReadWrite)
    }
}

/// One site that uses a binding.
///
/// `node` is the identifier for ordinary references and the
/// `ExportNamedDeclaration` / `ExportDefaultDeclaration` for exported
/// declarations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reference {
    pub node: NodeIndex,
    pub kind: ReferenceKind,
}

#[derive(Clone, Debug)]
pub struct Binding {
    pub name: String,
    pub scope: ScopeId,
    pub kind: BindingKind,
    /// Declaring identifiers, first declaration first. `var` redeclarations
    /// add entries.
    pub declarations: SmallVec<[NodeIndex; 1]>,
    pub references: Vec<Reference>,
    pub(crate) removed: bool,
}

impl Binding {
    pub(crate) fn new(name: &str, scope: ScopeId, kind: BindingKind, identifier: NodeIndex) -> Self {
        let mut declarations = SmallVec::new();
        declarations.push(identifier);
        Binding {
            name: name.to_string(),
            scope,
            kind,
            declarations,
            references: Vec::new(),
            removed: false,
        }
    }

    /// First declaring identifier.
    pub fn identifier(&self) -> NodeIndex {
        self.declarations.first().copied().unwrap_or(NodeIndex::NONE)
    }

    /// Any reference reads the value.
    pub fn is_referenced(&self) -> bool {
        self.references.iter().any(|r| r.kind.reads())
    }

    /// Any reference writes the value, or the binding is redeclared.
    pub fn is_written(&self) -> bool {
        self.declarations.len() > 1 || self.references.iter().any(|r| r.kind.writes())
    }

    /// Number of reading references.
    pub fn reference_count(&self) -> usize {
        self.references.iter().filter(|r| r.kind.reads()).count()
    }

    pub fn is_exported(&self) -> bool {
        self.references
            .iter()
            .any(|r| r.kind == ReferenceKind::Export)
    }
}
