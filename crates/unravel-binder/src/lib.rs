//! Scope and binding index for the unravel transforms.
//!
//! `BinderState` walks a program once to declare every binding in its scope,
//! then resolves each identifier reference against the scope chain. The
//! transforms keep the index current as they rewrite the tree:
//! `rename_fast` renames a binding at every site, `forget_subtree` and
//! `bind_subtree` follow removed and inserted statements, and
//! `merge_scope_into` re-homes bindings of a dissolved block.

pub mod binding;
pub use binding::{Binding, BindingId, BindingKind, Reference, ReferenceKind};

pub mod scope;
pub use scope::{Scope, ScopeId, ScopeKind};

pub mod identifiers;
pub use identifiers::{is_reserved_word, is_valid_identifier, to_identifier};

pub mod state;
pub use state::BinderState;

mod state_binding;
mod state_maintenance;
mod state_rename;
