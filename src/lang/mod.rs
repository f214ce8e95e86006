//! Values held on the machine stack.

pub mod value;

pub use value::Value;
