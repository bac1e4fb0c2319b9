//! Menu-driven harness
//!
//! Collects a demonstration choice and a variant choice, builds the request,
//! runs it and prints the outcome. All console traffic goes through the
//! injected [`LineReader`] and [`LineWriter`].

use crate::audit::AuditLog;
use crate::config::LabConfig;
use crate::console::{LineReader, LineWriter};
use crate::ops::{self, Input, OpError, OpKind, Outcome, Request, Variant};
use crate::report;
use std::io;
use thiserror::Error;

/// Harness errors. Every one of them ends the run with a non-zero status.
#[derive(Debug, Error)]
pub enum MenuError {
    #[error("failed to read input: {0}")]
    InputStream(io::Error),

    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("input ended before a choice was made")]
    EndOfInput,

    #[error(transparent)]
    Operation(#[from] OpError),
}

impl MenuError {
    /// Process exit status for this error.
    pub fn exit_code(&self) -> i32 {
        1
    }
}

/// How a menu run ended, when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Completed,
    InvalidChoice,
}

/// Top-level menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    Demo(OpKind),
    Summary,
}

pub const MAIN_MENU: [&str; 7] = [
    "Choose an option:",
    "1. Integer",
    "2. String",
    "3. Array",
    "4. Read",
    "5. Allocate",
    "6. Summary",
];

pub const CHOICE_PROMPT: &str = "Enter your choice: ";

pub const VARIANT_PROMPT: &str =
    "Do you want to run the safe or unsafe function? (1 for unsafe, 2 for safe): ";

pub const VALUE_PROMPT: &str = "Enter a value (blank for the demonstration value): ";

pub const INVALID_CHOICE: &str = "Invalid choice.";

/// Parse a top-level selection code.
pub fn parse_selection(line: &str) -> Option<Selection> {
    match line.trim().parse::<i64>().ok()? {
        1 => Some(Selection::Demo(OpKind::Int)),
        2 => Some(Selection::Demo(OpKind::String)),
        3 => Some(Selection::Demo(OpKind::Array)),
        4 => Some(Selection::Demo(OpKind::Read)),
        5 => Some(Selection::Demo(OpKind::Alloc)),
        6 => Some(Selection::Summary),
        _ => None,
    }
}

/// Parse a variant selection code.
pub fn parse_variant(line: &str) -> Option<Variant> {
    match line.trim().parse::<i64>().ok()? {
        1 => Some(Variant::Unsafe),
        2 => Some(Variant::Safe),
        _ => None,
    }
}

/// One harness run: configuration plus the optional audit log.
pub struct Session<'a> {
    config: &'a LabConfig,
    audit: Option<AuditLog>,
}

impl<'a> Session<'a> {
    pub fn new(config: &'a LabConfig) -> Self {
        Self {
            config,
            audit: None,
        }
    }

    pub fn audit(&self) -> Option<&AuditLog> {
        self.audit.as_ref()
    }

    /// Open the configured audit log. Failure is reported to `out` and the
    /// session carries on without one.
    pub fn attach_audit<W: LineWriter + ?Sized>(&mut self, out: &mut W) -> io::Result<()> {
        if !self.config.audit.enabled {
            return Ok(());
        }
        match AuditLog::open(&self.config.audit.path) {
            Ok(log) => self.audit = Some(log),
            Err(e) => {
                log::warn!("{}", e);
                out.write_line(&format!("Warning: {}", e))?;
            }
        }
        Ok(())
    }

    /// Run the interactive two-level menu once.
    pub fn run_menu<R, W>(&mut self, input: &mut R, out: &mut W) -> Result<RunStatus, MenuError>
    where
        R: LineReader + ?Sized,
        W: LineWriter + ?Sized,
    {
        for line in MAIN_MENU {
            out.write_line(line)?;
        }
        out.write_prompt(CHOICE_PROMPT)?;

        let kind = match parse_selection(&read_required(input)?) {
            Some(Selection::Demo(kind)) => kind,
            Some(Selection::Summary) => {
                self.run_summary(out)?;
                return Ok(RunStatus::Completed);
            }
            None => return invalid_choice(out),
        };

        let variant = if kind.has_unsafe_variant() {
            out.write_prompt(VARIANT_PROMPT)?;
            match parse_variant(&read_required(input)?) {
                Some(variant) => variant,
                None => return invalid_choice(out),
            }
        } else {
            Variant::Safe
        };

        let request = if self.config.menu.prompt_for_values {
            out.write_prompt(VALUE_PROMPT)?;
            let raw = read_required(input)?;
            if raw.trim().is_empty() {
                Request::demo(kind, variant, self.config)
            } else {
                match Input::parse(kind, &raw) {
                    Ok(value) => Request::new(kind, variant, value),
                    Err(e) => {
                        out.write_line(&format!("Invalid input: {}", e))?;
                        return Ok(RunStatus::InvalidChoice);
                    }
                }
            }
        } else {
            Request::demo(kind, variant, self.config)
        };

        out.write_line("")?;
        out.write_line(&format!(
            "Demonstrating {} Function for {}:",
            variant.title(),
            kind.title()
        ))?;
        self.run_request(&request, out)?;
        Ok(RunStatus::Completed)
    }

    /// Run a single request and print its outcome.
    ///
    /// Inputs the harness refuses to hand to an operation (an unsafe write that
    /// would leave its frame, input of the wrong shape) are reported and yield
    /// `Ok(None)`, as does a variant the operation does not have. Allocation
    /// failure is returned as an error.
    pub fn run_request<W: LineWriter + ?Sized>(
        &mut self,
        request: &Request,
        out: &mut W,
    ) -> Result<Option<Outcome>, MenuError> {
        let outcome = match ops::execute(request, self.config) {
            Ok(outcome) => outcome,
            Err(e @ (OpError::Buffer(_) | OpError::InvalidInput { .. })) => {
                out.write_line(&format!(
                    "[{} Function {}] Refused: {}",
                    request.variant.title(),
                    request.kind.tag_name(),
                    e
                ))?;
                return Ok(None);
            }
            Err(e @ OpError::UnsupportedVariant { .. }) => {
                log::debug!("{}", e);
                out.write_line(INVALID_CHOICE)?;
                return Ok(None);
            }
            Err(e) => {
                out.write_line(&format!(
                    "[{} Function {}] {}",
                    request.variant.title(),
                    request.kind.tag_name(),
                    e
                ))?;
                return Err(e.into());
            }
        };

        for line in outcome.lines() {
            out.write_line(&line)?;
        }

        if let Some(audit) = self.audit.as_mut() {
            if let Err(e) = audit.record(request, &outcome) {
                log::warn!("{}", e);
            }
        }
        Ok(Some(outcome))
    }

    /// Print the demonstration summary table.
    pub fn run_summary<W: LineWriter + ?Sized>(&self, out: &mut W) -> Result<(), MenuError> {
        let rows = report::build_summary(self.config)?;
        out.write_line("")?;
        out.write_line("Demonstration summary:")?;
        for line in report::render_table(&rows) {
            out.write_line(&line)?;
        }
        Ok(())
    }
}

fn read_required<R: LineReader + ?Sized>(input: &mut R) -> Result<String, MenuError> {
    input
        .read_line()
        .map_err(MenuError::InputStream)?
        .ok_or(MenuError::EndOfInput)
}

fn invalid_choice<W: LineWriter + ?Sized>(out: &mut W) -> Result<RunStatus, MenuError> {
    out.write_line(INVALID_CHOICE)?;
    Ok(RunStatus::InvalidChoice)
}
