//! Deobfuscation passes.
//!
//! - `transform` - the `Transform` contract and the traversal driver
//! - `control_flow_switch` - rebuilds statement order from a flattened
//!   `switch` dispatcher
//! - `string_array` - finds the wrapped string array accessor and inlines
//!   plain literal arrays
//! - `mangle` - renames bindings from their syntactic role
//!
//! Every pass works on a `Program` (arena, root and binder) and keeps the
//! binder index consistent with the rewrites it makes.

pub mod program;
pub use program::Program;

pub mod transform;
pub use transform::{Transform, TransformContext, TransformState, TransformTags, apply_transform};

pub mod const_eval;

pub mod control_flow_switch;
pub use control_flow_switch::ControlFlowSwitch;

pub mod string_array;
pub use string_array::{StringArray, StringArrayTransform, find_string_array};

pub mod naming;

pub mod mangle;
pub use mangle::{Mangle, MangleMode};
