//! Overflow Lab - buffer overflows next to their mitigations
//!
//! Every demonstration is a pair of operations over the same fixed-capacity
//! buffer. The unsafe variant performs a write or copy with no capacity check;
//! the safe variant validates first and either truncates or refuses.
//!
//! # Storage
//!
//! - **Unsafe variants** use a [`Frame`]: a `#[repr(C)]` fixed-size array
//!   followed by a spill region filled with a canary. Overflowing writes really
//!   do run past the array, and the canary shows how far they got.
//! - **Safe variants** use a [`BoundedBuffer`]: a heap-backed container with a
//!   fixed capacity and checked accessors.
//!
//! # Example
//!
//! ```rust
//! use overflow_lab::ops::{array, int, string};
//!
//! // Out-of-bounds index write: the buffer looks untouched, the neighbor is not
//! let outcome = int::unsafe_write(999, 3).unwrap();
//! assert_eq!(outcome.clobbered, 1);
//!
//! // The safe version refuses instead
//! assert!(int::safe_write(5, 42).is_rejected());
//!
//! // Truncating copies
//! let outcome = string::safe_copy(b"ThisIsAVeryLongInputThatWillOverflow");
//! assert_eq!(outcome.dropped, 27);
//!
//! let outcome = array::safe_copy(&[1, 2, 3]);
//! assert_eq!(outcome.lines()[0], "[Safe Function Array] Buffer values: 1 2 3 0 0");
//! ```
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   Request    ┌──────────────┐   Outcome   ┌──────────────┐
//! │ menu/Session │ ───────────▶ │  ops::execute│ ──────────▶ │ LineWriter   │
//! └──────┬───────┘              └──────┬───────┘             │ AuditLog     │
//!        │ LineReader                  │                     └──────────────┘
//!        ▼                             ▼
//!   stdin / script           Frame (unsafe) / BoundedBuffer (safe)
//! ```

#![warn(clippy::all)]

pub mod audit;
pub mod buffer;
pub mod config;
pub mod console;
pub mod menu;
pub mod ops;
pub mod report;

// Re-export commonly used types
pub use audit::{AuditError, AuditLog};
pub use buffer::{BoundedBuffer, BufferError, Frame};
pub use config::{ConfigError, LabConfig};
pub use console::{CapturedOutput, LineReader, LineWriter, ScriptedInput, StdinReader, StdoutWriter};
pub use menu::{MenuError, RunStatus, Session};
pub use ops::{execute, Contents, Input, OpError, OpKind, Outcome, Request, Variant};
pub use report::{build_summary, SummaryRow};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
