pub mod utils;
pub mod vector;

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VectorError {
    #[error("Dimensions of LHS({lhs}) and RHS({rhs}) do not match")]
    DimensionMismatch { lhs: usize, rhs: usize },
    #[error("Invalid vector division by 0")]
    DivideByZero,
    #[error("Index {index} is not valid for a vector with {dimensions} dimensions")]
    OutOfRange { index: usize, dimensions: usize },
    #[error("Vector with no dimensions does not have a {operation}")]
    ZeroDimension { operation: &'static str },
    #[error("Vector with zero euclidean norm does not have a unit vector")]
    ZeroNorm,
}

pub type Result<T> = std::result::Result<T, VectorError>;

// Re-export main types for convenience
pub use utils::{dot, norm, unit};
pub use vector::Vector;
