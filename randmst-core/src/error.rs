//! Error types for the randmst core library.
//!
//! Defines the error enum exposed by the public API and a convenient result
//! alias. Every variant maps onto a stable machine-readable code so the CLI
//! can log failures without matching on display strings.

use thiserror::Error;

use crate::mst::MstError;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl ::core::fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

pub(crate) use define_error_codes;

/// Error type produced when configuring or running an experiment.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum RandMstError {
    /// The requested dimension lies outside `0..=4`.
    #[error("dimension must be between 0 and 4 inclusive (got {got})")]
    InvalidDimension {
        /// The dimension supplied by the caller.
        got: i64,
    },
    /// The requested vertex count lies outside `1..=max`.
    #[error("vertex count must be between 1 and {max} inclusive (got {got})")]
    InvalidVertexCount {
        /// The vertex count supplied by the caller.
        got: usize,
        /// The largest accepted vertex count.
        max: usize,
    },
    /// At least one trial must be requested.
    #[error("trial count must be at least 1 (got {got})")]
    InvalidTrialCount {
        /// The trial count supplied by the caller.
        got: usize,
    },
    /// A caller-supplied point did not match the instance dimension.
    #[error("point {index} has {actual} coordinates but the dimension requires {expected}")]
    CoordinateMismatch {
        /// Position of the offending point.
        index: usize,
        /// Number of coordinates the dimension requires.
        expected: usize,
        /// Number of coordinates actually supplied.
        actual: usize,
    },
    /// The spanning tree computation failed.
    #[error("spanning tree computation failed: {error}")]
    Mst {
        #[source]
        /// Underlying failure raised by the Prim driver.
        error: MstError,
    },
}

impl From<MstError> for RandMstError {
    fn from(error: MstError) -> Self {
        Self::Mst { error }
    }
}

define_error_codes! {
    /// Stable codes describing [`RandMstError`] variants.
    enum RandMstErrorCode for RandMstError {
        /// The requested dimension lies outside `0..=4`.
        InvalidDimension => InvalidDimension { .. } => "RANDMST_INVALID_DIMENSION",
        /// The requested vertex count is out of range.
        InvalidVertexCount => InvalidVertexCount { .. } => "RANDMST_INVALID_VERTEX_COUNT",
        /// The requested trial count is zero.
        InvalidTrialCount => InvalidTrialCount { .. } => "RANDMST_INVALID_TRIAL_COUNT",
        /// A caller-supplied point did not match the instance dimension.
        CoordinateMismatch => CoordinateMismatch { .. } => "RANDMST_COORDINATE_MISMATCH",
        /// The spanning tree computation failed.
        MstFailure => Mst { .. } => "RANDMST_MST_FAILURE",
    }
}

impl RandMstError {
    /// Retrieve the inner MST error code when the failure came from the Prim driver.
    #[must_use]
    pub const fn mst_code(&self) -> Option<crate::mst::MstErrorCode> {
        match self {
            Self::Mst { error } => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, RandMstError>;
