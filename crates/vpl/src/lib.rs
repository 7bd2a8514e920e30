//! Visual rule compiler.
//!
//! Translates an ordered list of "event → state filter → actions" rules, as
//! built in the visual editor, into the text of an event-driven robot script:
//!
//! ```text
//! Program ──► CodeGenerator ──► segments + rule → segment table
//!                  │
//!                  └── translate (one pure function per block kind)
//! ```
//!
//! Rules reacting to the same event share one handler. The generator keeps
//! track of which segment every rule produced so the editor can highlight
//! the code of the selected rule.

pub mod block;
pub mod bucket;
pub mod error;
pub mod features;
pub mod generator;
pub mod kinds;
pub mod preamble;
pub mod program;
pub mod segment;
pub mod translate;

pub use block::{Block, BlockKind, BlockRole};
pub use error::{CompileError, InternalError};
pub use features::{Feature, Features};
pub use generator::{CodeGenerator, CompiledProgram};
pub use kinds::{Note, SensorTest, StateSlot, TiltMode};
pub use program::{Program, Rule};

pub type CompileResult = Result<CompiledProgram, CompileError>;

/// Compile a whole program. Every call starts from scratch, so compiling the
/// same program twice yields identical output.
pub fn compile(program: &Program) -> CompileResult {
    CodeGenerator::new(program.advanced_mode()).generate(program.rules())
}
