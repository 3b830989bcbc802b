use crate::{vector::Vector, Result, VectorError};
use log::debug;

/// Euclidean norm of `vector`, served from its cache when one is set.
pub fn norm(vector: &Vector) -> Result<f64> {
    if vector.is_empty() {
        return Err(zero_dimension("norm"));
    }
    Ok(vector.euclidean_norm())
}

/// `vector` scaled to a norm of 1.
pub fn unit(vector: &Vector) -> Result<Vector> {
    if vector.is_empty() {
        return Err(zero_dimension("unit vector"));
    }

    let norm = vector.euclidean_norm();
    if norm == 0.0 {
        debug!("Cannot normalize a vector with zero norm");
        return Err(VectorError::ZeroNorm);
    }

    Ok(Vector::from(vector.as_array().mapv(|magnitude| magnitude / norm)))
}

pub fn dot(x: &Vector, y: &Vector) -> Result<f64> {
    x.check_dimensions(y)?;
    Ok(x.as_array().dot(y.as_array()))
}

fn zero_dimension(operation: &'static str) -> VectorError {
    let err = VectorError::ZeroDimension { operation };
    debug!("Rejected vector operation: {err}");
    err
}
