pub mod array;
pub use array::Array;

pub mod stack;
pub use stack::Stack;
