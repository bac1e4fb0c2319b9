//! Buffer Operations
//!
//! Each demonstration is a pair of operations over the same kind of buffer:
//!
//! | Kind   | Unsafe variant                              | Safe variant                               |
//! |--------|---------------------------------------------|--------------------------------------------|
//! | Int    | write at a fixed index, no capacity check   | validate index, then write a sentinel      |
//! | String | `strcpy` into a 10-byte frame               | copy `capacity - 1` bytes and terminate    |
//! | Array  | copy every source element                   | copy `min(len, capacity)` elements         |
//! | Read   | read past the logical length                | read only below the length                 |
//! | Alloc  | (none)                                      | size-checked, scoped allocation            |
//!
//! Operations are pure: they build their buffer, act on it, and return an
//! [`Outcome`]. Printing is left to the caller.

pub mod alloc;
pub mod array;
pub mod int;
pub mod read;
pub mod string;

use crate::buffer::BufferError;
use crate::config::LabConfig;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Operation errors.
#[derive(Debug, Error)]
pub enum OpError {
    #[error("allocation of {requested} element(s) failed: {reason}")]
    Allocation { requested: usize, reason: String },

    #[error(transparent)]
    Buffer(#[from] BufferError),

    #[error("{kind} has no {variant} variant")]
    UnsupportedVariant { kind: OpKind, variant: Variant },

    #[error("invalid {kind} input {input:?}: {reason}")]
    InvalidInput {
        kind: OpKind,
        input: String,
        reason: String,
    },
}

/// Result type for operations.
pub type OpResult<T> = Result<T, OpError>;

/// Which buffer a demonstration works on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    Int,
    String,
    Array,
    Read,
    Alloc,
}

impl OpKind {
    pub const ALL: [OpKind; 5] = [
        OpKind::Int,
        OpKind::String,
        OpKind::Array,
        OpKind::Read,
        OpKind::Alloc,
    ];

    /// Name used in status-line tags, e.g. `Int` in `[Safe Function Int]`.
    pub fn tag_name(self) -> &'static str {
        match self {
            OpKind::Int => "Int",
            OpKind::String => "String",
            OpKind::Array => "Array",
            OpKind::Read => "Read",
            OpKind::Alloc => "Alloc",
        }
    }

    /// Name used in the "Demonstrating ... for X" banner.
    pub fn title(self) -> &'static str {
        match self {
            OpKind::Int => "Integer",
            OpKind::String => "String",
            OpKind::Array => "Array",
            OpKind::Read => "Read",
            OpKind::Alloc => "Allocation",
        }
    }

    /// Whether an unsafe counterpart exists.
    pub fn has_unsafe_variant(self) -> bool {
        !matches!(self, OpKind::Alloc)
    }
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OpKind::Int => "int",
            OpKind::String => "string",
            OpKind::Array => "array",
            OpKind::Read => "read",
            OpKind::Alloc => "alloc",
        };
        f.write_str(name)
    }
}

impl FromStr for OpKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "int" | "integer" => Ok(OpKind::Int),
            "string" | "str" => Ok(OpKind::String),
            "array" => Ok(OpKind::Array),
            "read" => Ok(OpKind::Read),
            "alloc" | "allocate" | "allocation" => Ok(OpKind::Alloc),
            other => Err(format!("unknown operation kind: {}", other)),
        }
    }
}

/// Unsafe or safe implementation of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    Unsafe,
    Safe,
}

impl Variant {
    pub fn title(self) -> &'static str {
        match self {
            Variant::Unsafe => "Unsafe",
            Variant::Safe => "Safe",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Variant::Unsafe => "unsafe",
            Variant::Safe => "safe",
        })
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "unsafe" => Ok(Variant::Unsafe),
            "safe" => Ok(Variant::Safe),
            other => Err(format!("unknown variant: {}", other)),
        }
    }
}

/// Input value for one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Input {
    /// Integer value (unsafe int), index (safe int, read) or size (alloc)
    Scalar(i64),
    /// Text to copy
    Text(String),
    /// Integers to copy
    Sequence(Vec<i32>),
}

impl Input {
    /// Parse user-supplied text into the input shape `kind` expects.
    pub fn parse(kind: OpKind, raw: &str) -> OpResult<Self> {
        let invalid = |reason: String| OpError::InvalidInput {
            kind,
            input: raw.to_string(),
            reason,
        };
        match kind {
            OpKind::String => Ok(Input::Text(raw.to_string())),
            OpKind::Array => raw
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|s| !s.is_empty())
                .map(|s| s.parse::<i32>().map_err(|e| invalid(e.to_string())))
                .collect::<OpResult<Vec<_>>>()
                .map(Input::Sequence),
            OpKind::Int | OpKind::Read | OpKind::Alloc => raw
                .trim()
                .parse::<i64>()
                .map(Input::Scalar)
                .map_err(|e| invalid(e.to_string())),
        }
    }

    /// The demonstration input for `kind`/`variant` taken from the config.
    pub fn demo(kind: OpKind, variant: Variant, config: &LabConfig) -> Self {
        let demo = &config.demo;
        match (kind, variant) {
            (OpKind::Int, Variant::Unsafe) => Input::Scalar(demo.unsafe_int_value),
            (OpKind::Int, Variant::Safe) => Input::Scalar(demo.safe_int_index),
            (OpKind::String, Variant::Unsafe) => Input::Text(demo.unsafe_string.clone()),
            (OpKind::String, Variant::Safe) => Input::Text(demo.safe_string.clone()),
            (OpKind::Array, Variant::Unsafe) => Input::Sequence(demo.unsafe_array.clone()),
            (OpKind::Array, Variant::Safe) => Input::Sequence(demo.safe_array.clone()),
            (OpKind::Read, _) => Input::Scalar(demo.read_index),
            (OpKind::Alloc, _) => Input::Scalar(demo.allocation_size),
        }
    }
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Input::Scalar(v) => write!(f, "{}", v),
            Input::Text(s) => write!(f, "{:?}", s),
            Input::Sequence(v) => {
                let items: Vec<String> = v.iter().map(|x| x.to_string()).collect();
                write!(f, "[{}]", items.join(", "))
            }
        }
    }
}

/// One operation to run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Request {
    pub kind: OpKind,
    pub variant: Variant,
    pub input: Input,
}

impl Request {
    pub fn new(kind: OpKind, variant: Variant, input: Input) -> Self {
        Self {
            kind,
            variant,
            input,
        }
    }

    /// Request carrying the configured demonstration input.
    pub fn demo(kind: OpKind, variant: Variant, config: &LabConfig) -> Self {
        Self::new(kind, variant, Input::demo(kind, variant, config))
    }
}

/// What an operation left in its buffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Contents {
    /// In-bounds integer slots
    Ints { values: Vec<i32> },
    /// Text up to the terminator
    Text { text: String },
    /// A single element read from a sequence
    Element { index: i64, value: i32 },
    /// A scoped allocation that has already been released
    Allocation { elements: usize, checksum: i64 },
    /// Nothing was produced (rejected before acting)
    Empty,
}

/// Result of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub kind: OpKind,
    pub variant: Variant,
    pub contents: Contents,
    /// Why a safe operation refused to act
    pub rejection: Option<String>,
    /// Source elements discarded by a truncating copy
    pub dropped: usize,
    /// Adjacent slots overwritten by an unchecked write
    pub clobbered: usize,
}

impl Outcome {
    pub fn new(kind: OpKind, variant: Variant, contents: Contents) -> Self {
        Self {
            kind,
            variant,
            contents,
            rejection: None,
            dropped: 0,
            clobbered: 0,
        }
    }

    pub fn rejected(kind: OpKind, variant: Variant, reason: impl Into<String>) -> Self {
        Self {
            rejection: Some(reason.into()),
            ..Self::new(kind, variant, Contents::Empty)
        }
    }

    pub fn with_dropped(mut self, dropped: usize) -> Self {
        self.dropped = dropped;
        self
    }

    pub fn with_clobbered(mut self, clobbered: usize) -> Self {
        self.clobbered = clobbered;
        self
    }

    pub fn is_rejected(&self) -> bool {
        self.rejection.is_some()
    }

    /// Status-line tag, e.g. `[Safe Function Int]`.
    pub fn tag(&self) -> String {
        format!(
            "[{} Function {}]",
            self.variant.title(),
            self.kind.tag_name()
        )
    }

    /// Human-readable status lines.
    pub fn lines(&self) -> Vec<String> {
        let tag = self.tag();
        if let Some(reason) = &self.rejection {
            return vec![format!("{} {}", tag, reason)];
        }

        let mut lines = Vec::new();
        let body = match &self.contents {
            Contents::Ints { values } => {
                let sep = if self.kind == OpKind::Int { ", " } else { " " };
                let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
                format!("Buffer values: {}", items.join(sep))
            }
            Contents::Text { text } => format!("Buffer contains: {}", text),
            Contents::Element { index, value } => {
                format!("Element at index {}: {}", index, value)
            }
            Contents::Allocation { elements, checksum } => format!(
                "Allocated {} element(s), checksum {}; released.",
                elements, checksum
            ),
            Contents::Empty => "Nothing to show.".to_string(),
        };
        lines.push(format!("{} {}", tag, body));

        if self.clobbered > 0 {
            lines.push(format!(
                "{} Overflow reached {} slot(s) of adjacent memory.",
                tag, self.clobbered
            ));
        }
        if self.dropped > 0 {
            lines.push(format!(
                "{} Input truncated: {} element(s) dropped.",
                tag, self.dropped
            ));
        }
        lines
    }

    /// One-word result for the audit log.
    pub fn verdict(&self) -> &'static str {
        if self.is_rejected() {
            "rejected"
        } else if self.clobbered > 0 {
            "overflowed"
        } else if self.dropped > 0 {
            "truncated"
        } else {
            "ok"
        }
    }
}

/// Run `request` against the limits in `config`.
pub fn execute(request: &Request, config: &LabConfig) -> OpResult<Outcome> {
    log::debug!(
        "executing {} {} with input {}",
        request.variant,
        request.kind,
        request.input
    );

    let mismatch = || OpError::InvalidInput {
        kind: request.kind,
        input: request.input.to_string(),
        reason: "wrong input shape".to_string(),
    };

    let outcome = match (request.kind, request.variant, &request.input) {
        (OpKind::Int, Variant::Unsafe, Input::Scalar(value)) => {
            int::unsafe_write(clamp_i32(*value), config.demo.unsafe_int_index)?
        }
        (OpKind::Int, Variant::Safe, Input::Scalar(index)) => {
            int::safe_write(*index, config.demo.sentinel)
        }
        (OpKind::String, Variant::Unsafe, Input::Text(text)) => {
            string::unsafe_copy(text.as_bytes())?
        }
        (OpKind::String, Variant::Safe, Input::Text(text)) => string::safe_copy(text.as_bytes()),
        (OpKind::Array, Variant::Unsafe, Input::Sequence(values)) => array::unsafe_copy(values)?,
        (OpKind::Array, Variant::Safe, Input::Sequence(values)) => array::safe_copy(values),
        (OpKind::Read, Variant::Unsafe, Input::Scalar(index)) => {
            read::unchecked_read(&config.demo.read_sequence, *index)?
        }
        (OpKind::Read, Variant::Safe, Input::Scalar(index)) => {
            read::checked_read(&config.demo.read_sequence, *index)
        }
        (OpKind::Alloc, Variant::Safe, Input::Scalar(size)) => {
            alloc::scoped_allocation(*size, config.limits.max_allocation)?
        }
        (OpKind::Alloc, Variant::Unsafe, _) => {
            return Err(OpError::UnsupportedVariant {
                kind: request.kind,
                variant: request.variant,
            })
        }
        _ => return Err(mismatch()),
    };

    if outcome.is_rejected() {
        log::warn!("{} rejected: {:?}", outcome.tag(), outcome.rejection);
    }
    if outcome.clobbered > 0 {
        log::warn!(
            "{} overwrote {} adjacent slot(s)",
            outcome.tag(),
            outcome.clobbered
        );
    }
    Ok(outcome)
}

fn clamp_i32(value: i64) -> i32 {
    value.clamp(i32::MIN as i64, i32::MAX as i64) as i32
}
