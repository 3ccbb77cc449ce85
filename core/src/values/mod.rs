mod format;
mod literal;

pub use format::{format_double, format_float};
pub use literal::Literal;

#[cfg(test)]
mod literal_test;
