use std::ops::{Deref, DerefMut, Index, IndexMut};

/// A boxed slice whose length is fixed at construction. Indexable by any integer type.
#[repr(transparent)]
pub struct Array<T> {
    inner: Box<[T]>,
}

impl<T> Array<T> {
    /// Create an array of `len` copies of `value`.
    pub fn filled(len: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from(vec![value; len])
    }

    pub fn as_slice(&self) -> &[T] {
        self
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }
}

impl<T> From<Vec<T>> for Array<T> {
    fn from(value: Vec<T>) -> Self {
        Self {
            inner: value.into_boxed_slice(),
        }
    }
}

impl<T> Default for Array<T> {
    fn default() -> Self {
        Self::from(Vec::new())
    }
}

impl<T> Deref for Array<T> {
    type Target = [T];
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<T> DerefMut for Array<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl<Idx, T> Index<Idx> for Array<T>
where
    Idx: TryInto<usize>,
{
    type Output = T;
    fn index(&self, index: Idx) -> &Self::Output {
        let index = crate::cast_usize!(index);
        &self.inner[index]
    }
}

impl<Idx, T> IndexMut<Idx> for Array<T>
where
    Idx: TryInto<usize>,
{
    fn index_mut(&mut self, index: Idx) -> &mut Self::Output {
        let index = crate::cast_usize!(index);
        &mut self.inner[index]
    }
}

#[cfg(test)]
mod tests {
    use super::Array;

    #[test]
    fn index_with_any_integer() {
        let array = Array::from(vec![1i32, 2, 3]);
        assert_eq!(array[0u32], 1);
        assert_eq!(array[1u8], 2);
        assert_eq!(array[2usize], 3);
    }

    #[test]
    fn constructors() {
        let zeros = Array::filled(4, 0.0f32);
        assert_eq!(zeros.as_slice(), &[0.0; 4]);

        let mut counts = Array::from(vec![0usize; 3]);
        counts[2u32] = 7;
        counts.as_mut_slice()[0] = 1;
        assert_eq!(counts.as_slice(), &[1, 0, 7]);
    }
}
