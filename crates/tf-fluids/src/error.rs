//! Fluid property errors.

use tf_core::TfError;
use thiserror::Error;

/// Result type for fluid operations.
pub type FluidResult<T> = Result<T, FluidError>;

/// Errors that can occur during fluid property calculations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FluidError {
    /// Non-physical values (negative density, pressure, etc.).
    #[error("Non-physical value for {what}")]
    NonPhysical { what: &'static str },

    /// Value out of the valid range of a table/polynomial model.
    #[error("Value out of range for {what}")]
    OutOfRange { what: &'static str },

    /// Invalid argument.
    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    /// Operation not supported by this fluid model.
    #[error("Not supported: {what}")]
    NotSupported { what: &'static str },
}

impl From<FluidError> for TfError {
    fn from(err: FluidError) -> Self {
        match err {
            FluidError::NonPhysical { what } => TfError::Invariant {
                what: Box::leak(format!("Non-physical fluid value: {}", what).into_boxed_str()),
            },
            FluidError::OutOfRange { what } => TfError::InvalidArg {
                what: Box::leak(format!("Fluid value out of range: {}", what).into_boxed_str()),
            },
            FluidError::InvalidArg { what } => TfError::InvalidArg {
                what: Box::leak(format!("Invalid fluid argument: {}", what).into_boxed_str()),
            },
            FluidError::NotSupported { what } => TfError::Invariant {
                what: Box::leak(
                    format!("Fluid operation not supported: {}", what).into_boxed_str(),
                ),
            },
        }
    }
}
