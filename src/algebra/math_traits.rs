use super::FloatT;

/// Dense vector operations on slices of [`FloatT`](crate::algebra::FloatT).
pub trait VectorMath {
    type T;

    /// Apply `op` to every element in place.
    fn scalarop(&mut self, op: impl Fn(Self::T) -> Self::T) -> &mut Self;

    /// Multiply every element by `c`.
    fn scale(&mut self, c: Self::T) -> &mut Self;

    /// Elementwise product, `self[i] *= y[i]`.
    fn hadamard(&mut self, y: &Self) -> &mut Self;

    /// Inner product with `y`.
    fn dot(&self, y: &Self) -> Self::T;

    /// Smallest entry, `+inf` when empty.
    fn minimum(&self) -> Self::T;

    /// Largest entry, `-inf` when empty.
    fn maximum(&self) -> Self::T;
}

/// Sparse matrix-vector product `y = a*A*x + b*y`.
pub trait MatrixVectorMultiply {
    type T: FloatT;

    fn gemv(&self, y: &mut [Self::T], x: &[Self::T], a: Self::T, b: Self::T);
}

/// In-place operations used by the scaling passes.
pub trait MatrixMath {
    type T: FloatT;

    /// Largest absolute value in each column.
    fn col_norms(&self, norms: &mut [Self::T]);

    /// `A = Diagonal(l) * A`
    fn lscale(&mut self, l: &[Self::T]);

    /// `A = A * Diagonal(r)`
    fn rscale(&mut self, r: &[Self::T]);

    /// `A = Diagonal(l) * A * Diagonal(r)`
    fn lrscale(&mut self, l: &[Self::T], r: &[Self::T]);
}
