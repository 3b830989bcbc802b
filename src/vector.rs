use crate::{utils, Result, VectorError};
use approx::{AbsDiffEq, RelativeEq};
use log::{debug, trace};
use ndarray::{Array1, Ix1};
use std::cell::Cell;
use std::collections::LinkedList;
use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

/// A fixed-dimension vector of `f64` magnitudes.
///
/// The dimension is set when the vector is built and only changes when the
/// whole value is replaced. The Euclidean norm is cached after the first
/// computation and discarded whenever a magnitude may have been written.
#[derive(Debug)]
pub struct Vector {
    magnitudes: Array1<f64>,
    cached_norm: Cell<Option<f64>>,
}

impl Vector {
    /// A one-dimensional vector holding `0.0`.
    pub fn new() -> Self {
        Self::zeros(1)
    }

    pub fn zeros(dimensions: usize) -> Self {
        Self::from(Array1::zeros(dimensions))
    }

    pub fn filled(dimensions: usize, magnitude: f64) -> Self {
        Self::from(Array1::from_elem(dimensions, magnitude))
    }

    pub fn from_slice(magnitudes: &[f64]) -> Self {
        Self::from(Array1::from_vec(magnitudes.to_vec()))
    }

    /// Moves the contents out of `self`, leaving an empty (zero-dimensional)
    /// vector behind. The cached norm travels with the contents.
    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::zeros(0))
    }

    pub fn dimensions(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Bounds-checked read of the magnitude at `index`.
    pub fn at(&self, index: usize) -> Result<f64> {
        self.magnitudes
            .get(index)
            .copied()
            .ok_or_else(|| out_of_range(index, self.dimensions()))
    }

    /// Bounds-checked mutable access to the magnitude at `index`.
    ///
    /// On success the cached norm is discarded whether or not the caller
    /// writes. A rejected index leaves it in place.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut f64> {
        let dimensions = self.dimensions();
        match self.magnitudes.get_mut(index) {
            Some(magnitude) => {
                self.cached_norm.set(None);
                Ok(magnitude)
            }
            None => Err(out_of_range(index, dimensions)),
        }
    }

    pub fn as_array(&self) -> &Array1<f64> {
        &self.magnitudes
    }

    pub fn iter(&self) -> ndarray::iter::Iter<'_, f64, Ix1> {
        self.magnitudes.iter()
    }

    pub fn iter_mut(&mut self) -> ndarray::iter::IterMut<'_, f64, Ix1> {
        self.cached_norm.set(None);
        self.magnitudes.iter_mut()
    }

    /// The norm computed by the last call to [`utils::norm`], if no magnitude
    /// has been touched since.
    pub fn cached_norm(&self) -> Option<f64> {
        self.cached_norm.get()
    }

    pub fn norm(&self) -> Result<f64> {
        utils::norm(self)
    }

    pub fn dot(&self, other: &Vector) -> Result<f64> {
        utils::dot(self, other)
    }

    /// Unary plus.
    pub fn positive(&self) -> Self {
        self.clone()
    }

    pub fn try_add(&self, rhs: &Vector) -> Result<Vector> {
        self.check_dimensions(rhs)?;
        Ok(Self::from(&self.magnitudes + &rhs.magnitudes))
    }

    pub fn try_sub(&self, rhs: &Vector) -> Result<Vector> {
        self.check_dimensions(rhs)?;
        Ok(Self::from(&self.magnitudes - &rhs.magnitudes))
    }

    pub fn try_div(&self, divisor: f64) -> Result<Vector> {
        check_divisor(divisor)?;
        Ok(Self::from(&self.magnitudes / divisor))
    }

    pub fn try_add_assign(&mut self, rhs: &Vector) -> Result<()> {
        self.check_dimensions(rhs)?;
        self.magnitudes += &rhs.magnitudes;
        self.cached_norm.set(None);
        Ok(())
    }

    pub fn try_sub_assign(&mut self, rhs: &Vector) -> Result<()> {
        self.check_dimensions(rhs)?;
        self.magnitudes -= &rhs.magnitudes;
        self.cached_norm.set(None);
        Ok(())
    }

    pub fn try_div_assign(&mut self, divisor: f64) -> Result<()> {
        check_divisor(divisor)?;
        self.magnitudes /= divisor;
        self.cached_norm.set(None);
        Ok(())
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.magnitudes.to_vec()
    }

    pub fn to_list(&self) -> LinkedList<f64> {
        self.magnitudes.iter().copied().collect()
    }

    pub(crate) fn check_dimensions(&self, rhs: &Vector) -> Result<()> {
        if self.dimensions() != rhs.dimensions() {
            let err = VectorError::DimensionMismatch {
                lhs: self.dimensions(),
                rhs: rhs.dimensions(),
            };
            debug!("Rejected vector operation: {err}");
            return Err(err);
        }
        Ok(())
    }

    /// Returns the cached norm, computing and storing it first if unset.
    pub(crate) fn euclidean_norm(&self) -> f64 {
        if let Some(norm) = self.cached_norm.get() {
            trace!("Norm cache hit: {norm}");
            return norm;
        }
        let sum_of_squares = self.magnitudes.dot(&self.magnitudes);
        let representable = sum_of_squares.is_finite() && sum_of_squares >= f64::MIN_POSITIVE;
        let norm = if representable || sum_of_squares.is_nan() {
            sum_of_squares.sqrt()
        } else {
            self.scaled_norm()
        };
        trace!("Computed norm {norm} over {} dimensions", self.dimensions());
        self.cached_norm.set(Some(norm));
        norm
    }

    /// Norm computed on magnitudes divided by the largest absolute one, for
    /// inputs whose squares overflow or underflow.
    fn scaled_norm(&self) -> f64 {
        let scale = self
            .magnitudes
            .fold(0.0_f64, |largest, magnitude| largest.max(magnitude.abs()));
        if scale == 0.0 || scale.is_infinite() {
            return scale;
        }
        let sum_of_squares = self.magnitudes.fold(0.0, |sum, magnitude| {
            let scaled = magnitude / scale;
            sum + scaled * scaled
        });
        scale * sum_of_squares.sqrt()
    }
}

fn out_of_range(index: usize, dimensions: usize) -> VectorError {
    let err = VectorError::OutOfRange { index, dimensions };
    debug!("Rejected vector access: {err}");
    err
}

fn check_divisor(divisor: f64) -> Result<()> {
    if divisor == 0.0 {
        debug!("Rejected vector division by 0");
        return Err(VectorError::DivideByZero);
    }
    Ok(())
}

impl Default for Vector {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Vector {
    fn clone(&self) -> Self {
        Self::from(self.magnitudes.clone())
    }

    fn clone_from(&mut self, source: &Self) {
        self.magnitudes.clone_from(&source.magnitudes);
        self.cached_norm.set(None);
    }
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.magnitudes == other.magnitudes
    }
}

impl AbsDiffEq for Vector {
    type Epsilon = f64;

    fn default_epsilon() -> Self::Epsilon {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: Self::Epsilon) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| f64::abs_diff_eq(a, b, epsilon))
    }
}

impl RelativeEq for Vector {
    fn default_max_relative() -> Self::Epsilon {
        f64::default_max_relative()
    }

    fn relative_eq(
        &self,
        other: &Self,
        epsilon: Self::Epsilon,
        max_relative: Self::Epsilon,
    ) -> bool {
        self.dimensions() == other.dimensions()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| f64::relative_eq(a, b, epsilon, max_relative))
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, magnitude) in self.magnitudes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            match f.precision() {
                Some(precision) => write!(f, "{magnitude:.precision$}")?,
                None => write!(f, "{magnitude}")?,
            }
        }
        f.write_str("]")
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    /// Unchecked hot-path read. `index` must be below [`Vector::dimensions`].
    fn index(&self, index: usize) -> &f64 {
        debug_assert!(index < self.dimensions());
        &self.magnitudes[index]
    }
}

impl IndexMut<usize> for Vector {
    fn index_mut(&mut self, index: usize) -> &mut f64 {
        debug_assert!(index < self.dimensions());
        self.cached_norm.set(None);
        &mut self.magnitudes[index]
    }
}

impl From<Array1<f64>> for Vector {
    fn from(magnitudes: Array1<f64>) -> Self {
        Self {
            magnitudes,
            cached_norm: Cell::new(None),
        }
    }
}

impl From<Vec<f64>> for Vector {
    fn from(magnitudes: Vec<f64>) -> Self {
        Self::from(Array1::from_vec(magnitudes))
    }
}

impl From<&[f64]> for Vector {
    fn from(magnitudes: &[f64]) -> Self {
        Self::from_slice(magnitudes)
    }
}

impl<const N: usize> From<[f64; N]> for Vector {
    fn from(magnitudes: [f64; N]) -> Self {
        Self::from(Array1::from_iter(magnitudes))
    }
}

impl FromIterator<f64> for Vector {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::from(Array1::from_iter(iter))
    }
}

impl<'a> FromIterator<&'a f64> for Vector {
    fn from_iter<I: IntoIterator<Item = &'a f64>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

impl From<Vector> for Vec<f64> {
    fn from(vector: Vector) -> Self {
        vector.magnitudes.into_raw_vec()
    }
}

impl From<&Vector> for Vec<f64> {
    fn from(vector: &Vector) -> Self {
        vector.to_vec()
    }
}

impl From<&Vector> for LinkedList<f64> {
    fn from(vector: &Vector) -> Self {
        vector.to_list()
    }
}

impl From<Vector> for Array1<f64> {
    fn from(vector: Vector) -> Self {
        vector.magnitudes
    }
}

impl From<&Vector> for Array1<f64> {
    fn from(vector: &Vector) -> Self {
        vector.magnitudes.clone()
    }
}

impl<'a> IntoIterator for &'a Vector {
    type Item = &'a f64;
    type IntoIter = ndarray::iter::Iter<'a, f64, Ix1>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for Vector {
    type Item = f64;
    type IntoIter = std::vec::IntoIter<f64>;

    fn into_iter(self) -> Self::IntoIter {
        Vec::from(self).into_iter()
    }
}

// Operator forms panic where the `try_*` methods return an error.

impl Neg for &Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::from(-&self.magnitudes)
    }
}

impl Neg for Vector {
    type Output = Vector;

    fn neg(self) -> Vector {
        Vector::from(-self.magnitudes)
    }
}

impl Add<&Vector> for &Vector {
    type Output = Vector;

    /// # Panics
    /// If the dimensions differ.
    fn add(self, rhs: &Vector) -> Vector {
        self.try_add(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Add<&Vector> for Vector {
    type Output = Vector;

    /// # Panics
    /// If the dimensions differ.
    fn add(mut self, rhs: &Vector) -> Vector {
        self += rhs;
        self
    }
}

impl Add for Vector {
    type Output = Vector;

    /// # Panics
    /// If the dimensions differ.
    fn add(self, rhs: Vector) -> Vector {
        self + &rhs
    }
}

impl Sub<&Vector> for &Vector {
    type Output = Vector;

    /// # Panics
    /// If the dimensions differ.
    fn sub(self, rhs: &Vector) -> Vector {
        self.try_sub(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Sub<&Vector> for Vector {
    type Output = Vector;

    /// # Panics
    /// If the dimensions differ.
    fn sub(mut self, rhs: &Vector) -> Vector {
        self -= rhs;
        self
    }
}

impl Sub for Vector {
    type Output = Vector;

    /// # Panics
    /// If the dimensions differ.
    fn sub(self, rhs: Vector) -> Vector {
        self - &rhs
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, rhs: f64) -> Vector {
        Vector::from(&self.magnitudes * rhs)
    }
}

impl Mul<f64> for Vector {
    type Output = Vector;

    fn mul(mut self, rhs: f64) -> Vector {
        self *= rhs;
        self
    }
}

impl Mul<&Vector> for f64 {
    type Output = Vector;

    fn mul(self, rhs: &Vector) -> Vector {
        rhs * self
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Vector {
        rhs * self
    }
}

impl Div<f64> for &Vector {
    type Output = Vector;

    /// # Panics
    /// If `rhs` is zero.
    fn div(self, rhs: f64) -> Vector {
        self.try_div(rhs).unwrap_or_else(|err| panic!("{err}"))
    }
}

impl Div<f64> for Vector {
    type Output = Vector;

    /// # Panics
    /// If `rhs` is zero.
    fn div(mut self, rhs: f64) -> Vector {
        self /= rhs;
        self
    }
}

impl AddAssign<&Vector> for Vector {
    /// # Panics
    /// If the dimensions differ.
    fn add_assign(&mut self, rhs: &Vector) {
        self.try_add_assign(rhs).unwrap_or_else(|err| panic!("{err}"));
    }
}

impl SubAssign<&Vector> for Vector {
    /// # Panics
    /// If the dimensions differ.
    fn sub_assign(&mut self, rhs: &Vector) {
        self.try_sub_assign(rhs).unwrap_or_else(|err| panic!("{err}"));
    }
}

impl MulAssign<f64> for Vector {
    fn mul_assign(&mut self, rhs: f64) {
        self.magnitudes *= rhs;
        self.cached_norm.set(None);
    }
}

impl DivAssign<f64> for Vector {
    /// # Panics
    /// If `rhs` is zero.
    fn div_assign(&mut self, rhs: f64) {
        self.try_div_assign(rhs).unwrap_or_else(|err| panic!("{err}"));
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn norm_is_cached_after_first_computation() {
        let vector = Vector::filled(3, 1.0);
        assert_eq!(vector.cached_norm(), None);
        assert_eq!(vector.euclidean_norm(), 3.0_f64.sqrt());
        assert_eq!(vector.cached_norm(), Some(3.0_f64.sqrt()));
    }

    #[test]
    fn mutable_indexing_resets_cache_without_writing() {
        let mut vector = Vector::filled(3, 1.0);
        vector.euclidean_norm();
        let _ = &mut vector[1];
        assert_eq!(vector.cached_norm(), None);
    }

    #[test]
    fn every_mutation_path_resets_cache() {
        let other = Vector::filled(2, 1.0);
        let mutations: [fn(&mut Vector, &Vector); 7] = [
            |v, _| {
                let _ = v.at_mut(0);
            },
            |v, o| v.try_add_assign(o).unwrap(),
            |v, o| v.try_sub_assign(o).unwrap(),
            |v, _| *v *= 2.0,
            |v, _| v.try_div_assign(2.0).unwrap(),
            |v, _| {
                let _ = v.iter_mut();
            },
            |v, o| v.clone_from(o),
        ];

        for mutate in mutations {
            let mut vector = Vector::from([3.0, 4.0]);
            assert_eq!(vector.euclidean_norm(), 5.0);
            mutate(&mut vector, &other);
            assert_eq!(vector.cached_norm(), None);
        }
    }

    #[test]
    fn rejected_operations_leave_cache_and_values_intact() {
        let mut vector = Vector::from([3.0, 4.0]);
        vector.euclidean_norm();

        assert!(vector.try_add_assign(&Vector::zeros(3)).is_err());
        assert!(vector.try_div_assign(0.0).is_err());
        assert!(vector.at_mut(5).is_err());

        assert_eq!(vector.cached_norm(), Some(5.0));
        assert_eq!(vector, Vector::from([3.0, 4.0]));
    }

    #[test]
    fn norm_survives_overflowing_and_underflowing_squares() {
        let large = Vector::from([3e200, 4e200]);
        assert_relative_eq!(large.euclidean_norm(), 5e200, max_relative = 1e-15);

        let tiny = Vector::from([3e-200, -4e-200]);
        assert_relative_eq!(tiny.euclidean_norm(), 5e-200, max_relative = 1e-15);

        assert_eq!(Vector::zeros(3).euclidean_norm(), 0.0);
        assert_eq!(Vector::from([1.0, f64::INFINITY]).euclidean_norm(), f64::INFINITY);
        assert!(Vector::from([f64::NAN, 1.0]).euclidean_norm().is_nan());
    }

    #[test]
    fn clone_resets_cache_and_take_keeps_it() {
        let mut vector = Vector::from([3.0, 4.0]);
        vector.euclidean_norm();

        let copy = vector.clone();
        assert_eq!(copy.cached_norm(), None);

        let moved = vector.take();
        assert_eq!(moved.cached_norm(), Some(5.0));
        assert_eq!(vector.dimensions(), 0);
    }

    #[test]
    fn display_honours_precision() {
        let vector = Vector::from([1.0, 2.5, -0.126]);
        assert_eq!(format!("{vector:.2}"), "[1.00 2.50 -0.13]");
    }
}
