//! Error type shared by every module of the crate.
//!
//! Configuration errors and invariant violations both abort the current run;
//! nothing in the crate retries or silently corrects them.

use std::fmt;

/// Identifier of an object to be grouped (dense, zero-based).
pub type ObjectId = usize;

/// Errors raised by the grouping GA and the PROMETHEE kernel.
#[derive(Debug, Clone, PartialEq)]
pub enum GgaError {
    /// Object identifiers are not `0..n` in order.
    ///
    /// `position` is the index in the input sequence, `found` the identifier
    /// carried by the object at that position.
    NonContiguousIdentifiers { position: usize, found: ObjectId },

    /// A configuration value is out of range.
    InvalidParameter(String),

    /// A heuristic needed a new group for `object` but the pool is full.
    GroupPoolExhausted { object: ObjectId, capacity: usize },

    /// The group pool reached its hard maximum.
    CapacityExceeded { capacity: usize },

    /// Neither a generation limit nor a stagnation limit was configured.
    MissingStopCondition,

    /// An internal consistency check failed.
    InvariantViolation(String),

    /// The object already belongs to another group.
    AlreadyAssigned { object: ObjectId, group: usize },

    /// The object is not a member of the given group.
    NotMember { object: ObjectId, group: usize },

    /// A ranking was queried before it was computed.
    NotComputed,

    /// A (solution, criterion) pair was never assigned a value.
    MissingAssignment { solution: usize, criterion: usize },

    /// A handle does not refer to anything known to its owner.
    UnknownHandle(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GgaError>;

impl fmt::Display for GgaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GgaError::NonContiguousIdentifiers { position, found } => write!(
                f,
                "object identifiers must be contiguous: position {position} holds id {found}"
            ),
            GgaError::InvalidParameter(msg) => write!(f, "invalid parameter: {msg}"),
            GgaError::GroupPoolExhausted { object, capacity } => write!(
                f,
                "no group available for object {object}: pool of {capacity} groups exhausted"
            ),
            GgaError::CapacityExceeded { capacity } => {
                write!(f, "group pool capacity of {capacity} exceeded")
            }
            GgaError::MissingStopCondition => {
                write!(f, "a stop condition (max generations or stagnation) must be configured")
            }
            GgaError::InvariantViolation(msg) => write!(f, "invariant violation: {msg}"),
            GgaError::AlreadyAssigned { object, group } => {
                write!(f, "object {object} is already assigned to group {group}")
            }
            GgaError::NotMember { object, group } => {
                write!(f, "object {object} is not a member of group {group}")
            }
            GgaError::NotComputed => write!(f, "PROMETHEE ranking has not been computed"),
            GgaError::MissingAssignment {
                solution,
                criterion,
            } => write!(
                f,
                "solution {solution} has no value for criterion {criterion}"
            ),
            GgaError::UnknownHandle(msg) => write!(f, "unknown handle: {msg}"),
        }
    }
}

impl std::error::Error for GgaError {}

impl From<String> for GgaError {
    fn from(msg: String) -> Self {
        GgaError::InvalidParameter(msg)
    }
}

impl<'a> From<&'a str> for GgaError {
    fn from(msg: &'a str) -> Self {
        GgaError::InvalidParameter(msg.to_string())
    }
}
