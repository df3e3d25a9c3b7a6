use super::{FloatT, VectorMath};
use std::iter::zip;

impl<T: FloatT> VectorMath for [T] {
    type T = T;

    fn scalarop(&mut self, op: impl Fn(T) -> T) -> &mut Self {
        self.iter_mut().for_each(|x| *x = op(*x));
        self
    }

    fn scale(&mut self, c: T) -> &mut Self {
        self.scalarop(|x| x * c)
    }

    fn hadamard(&mut self, y: &[T]) -> &mut Self {
        assert_eq!(self.len(), y.len());
        zip(&mut *self, y).for_each(|(x, &s)| *x *= s);
        self
    }

    fn dot(&self, y: &[T]) -> T {
        assert_eq!(self.len(), y.len());
        // Kahan summation
        let mut sum = T::zero();
        let mut carry = T::zero();
        for (&a, &b) in zip(self, y) {
            let term = a * b - carry;
            let next = sum + term;
            carry = (next - sum) - term;
            sum = next;
        }
        sum
    }

    fn minimum(&self) -> T {
        self.iter().fold(T::infinity(), |lo, &x| lo.min(x))
    }

    fn maximum(&self) -> T {
        self.iter().fold(T::neg_infinity(), |hi, &x| hi.max(x))
    }
}
