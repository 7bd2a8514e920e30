use std::fmt;

use crate::block::BlockRole;
use crate::kinds::TILT_RESOLUTION;

/// A block broke the editor contract.
///
/// The editor only builds blocks from the fixed vocabulary, so none of these
/// can come from legitimate input. They abort the compile without output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InternalError {
    UnexpectedRole { expected: BlockRole, found: BlockRole },
    UnknownKind { role: BlockRole, kind: String },
    ValueCount { kind: &'static str, expected: usize, found: usize },
    UnknownTiltMode(i32),
    TiltAngleOutOfRange(i32),
    NoteOutOfRange { slot: usize, value: i32 },
    TooManyActions { count: usize, max: usize },
    /// State filter or state write in a program compiled in basic mode.
    StateInBasicMode,
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InternalError::UnexpectedRole { expected, found } => {
                write!(f, "expected {expected} block, found {found} block")
            }
            InternalError::UnknownKind { role, kind } => {
                write!(f, "unknown {role} block kind `{kind}`")
            }
            InternalError::ValueCount { kind, expected, found } => {
                write!(f, "`{kind}` block carries {found} values, expected {expected}")
            }
            InternalError::UnknownTiltMode(mode) => write!(f, "unknown tilt mode {mode}"),
            InternalError::TiltAngleOutOfRange(angle) => {
                write!(f, "tilt angle {angle} outside -{TILT_RESOLUTION}..={TILT_RESOLUTION}")
            }
            InternalError::NoteOutOfRange { slot, value } => {
                write!(f, "sound note {slot} has no pitch/duration for value {value:#x}")
            }
            InternalError::TooManyActions { count, max } => {
                write!(f, "rule carries {count} actions, at most {max} allowed")
            }
            InternalError::StateInBasicMode => {
                write!(f, "rule uses persistent state but the program is in basic mode")
            }
        }
    }
}

impl std::error::Error for InternalError {}

/// Why a compile produced no program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompileError {
    /// Internal compiler error. Not retried; the caller keeps the previous
    /// output, if any, and reports the diagnostic.
    Internal {
        rule_index: Option<usize>,
        error: InternalError,
    },
}

impl CompileError {
    pub fn internal(rule_index: usize, error: InternalError) -> Self {
        CompileError::Internal {
            rule_index: Some(rule_index),
            error,
        }
    }

    /// Index of the offending rule, when the failure can be attributed.
    pub fn rule_index(&self) -> Option<usize> {
        match self {
            CompileError::Internal { rule_index, .. } => *rule_index,
        }
    }

    pub fn is_internal(&self) -> bool {
        matches!(self, CompileError::Internal { .. })
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileError::Internal {
                rule_index: Some(index),
                error,
            } => write!(f, "internal compiler error in rule {index}: {error}"),
            CompileError::Internal {
                rule_index: None,
                error,
            } => write!(f, "internal compiler error: {error}"),
        }
    }
}

impl std::error::Error for CompileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CompileError::Internal { error, .. } => Some(error),
        }
    }
}
