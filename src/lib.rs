//! unravel: reverses control-flow flattening, extracted string arrays and
//! name mangling in obfuscated JavaScript.
//!
//! The work happens in the member crates; this crate re-exports them under
//! one roof and owns the tracing subscriber setup.
//!
//! ```ignore
//! let mut program = unravel::parse_program(source)?;
//! unravel::apply_transform(&mut program, &mut unravel::ControlFlowSwitch::new(), &mut unravel::NoopSink);
//! println!("{}", program.print());
//! ```

pub use unravel_ast as ast;
pub use unravel_binder as binder;
pub use unravel_common as common;
pub use unravel_matcher as matcher;
pub use unravel_parser as parser;
pub use unravel_transforms as transforms;

pub use unravel_common::{
    CollectingSink, Diagnostic, DiagnosticCategory, DiagnosticSink, NoopSink, TracingSink,
    TransformOptions,
};
pub use unravel_parser::ParseError;
pub use unravel_transforms::{
    ControlFlowSwitch, Mangle, MangleMode, Program, StringArray, StringArrayTransform, Transform,
    TransformContext, TransformState, TransformTags, apply_transform, find_string_array,
};

// Tracing subscriber configuration
pub mod tracing_config;

/// Parse `source` into a bound `Program` with default options.
pub fn parse_program(source: &str) -> Result<Program, ParseError> {
    parse_program_with_options(source, TransformOptions::default())
}

/// Parse `source` into a bound `Program` that carries `options`.
pub fn parse_program_with_options(
    source: &str,
    options: TransformOptions,
) -> Result<Program, ParseError> {
    let parsed = unravel_parser::parse(source)?;
    Ok(Program::with_options(parsed.arena, parsed.root, options))
}
