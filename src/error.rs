//! Error types for lunisolar calendar calculations.
//!
//! The main error type is [`CalendarError`], which covers all possible errors
//! in the crate:
//!
//! - **Ephemeris errors**: kernel missing, unreadable, or without coverage
//! - **Solver errors**: root-finding failures for a single event task
//! - **Calendar errors**: inconsistent new-moon or principal-term structure
//! - **Input errors**: unknown codes, out-of-range arguments
//!
//! Every error renders as a single line naming the failing component and the
//! relevant input, so batch workers can report them without further mangling.
//!
//! # Example
//!
//! ```
//! use lunisolar_astro::error::CalendarError;
//!
//! let err = CalendarError::UnknownCode { code: "Z13".into() };
//! assert_eq!(err.to_string(), "unknown solar term or phase code: Z13");
//! ```

use thiserror::Error;

/// Main error type for lunisolar-astro operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalendarError {
    /// The SPK kernel is missing, unreadable, or lacks coverage for the
    /// requested instant. Fatal: always surfaces to the caller.
    #[error("ephemeris unavailable: {reason}")]
    EphemerisUnavailable {
        /// What the backend reported
        reason: String,
    },

    /// Newton iteration and the bracket fallback both failed for one task.
    #[error("root solver did not converge ({kind} target {target_angle} rad from JD {initial_jd})")]
    DidNotConverge {
        /// Task kind ("solar" or "lunar")
        kind: &'static str,
        /// Target angle in radians
        target_angle: f64,
        /// Initial guess, JD TDB
        initial_jd: f64,
    },

    /// A solar-term code or lunar-phase key outside the defined sets.
    #[error("unknown solar term or phase code: {code}")]
    UnknownCode {
        /// The offending code
        code: String,
    },

    /// A required anchor root is absent from a batch result.
    #[error("missing required root: {what}")]
    MissingRoot {
        /// Which anchor could not be solved
        what: String,
    },

    /// New-moon enumeration between winter solstices produced an impossible
    /// month count.
    #[error("expected 12 or 13 new moons between solstices of {year}, found {count}")]
    SparseNewMoonList {
        /// Civil year whose lunar year was being built
        year: i32,
        /// Number of enumerated months
        count: usize,
    },

    /// A 13-month lunar year in which every month contains a principal term.
    /// Indicates inconsistent inputs.
    #[error("no month without a principal term in 13-month lunar year {year}")]
    LeapNotFound {
        /// Civil year whose lunar year was being built
        year: i32,
    },

    /// Invalid caller-supplied argument.
    #[error("invalid input: {reason}")]
    InvalidInput {
        /// Description of the issue
        reason: String,
    },
}

/// Type alias for Results in this crate.
pub type Result<T> = std::result::Result<T, CalendarError>;
