//! Small real-time friendly building blocks shared by the other crates.
//!
//! Nothing in here allocates after construction.
pub mod collections;
mod macros;

pub use collections::{Array, Stack};

#[cfg(test)]
mod tests {
    #[test]
    fn cast() {
        let n: u32 = 17;
        assert_eq!(crate::cast_usize!(n), 17usize);
    }
}
