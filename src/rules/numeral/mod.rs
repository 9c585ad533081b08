//! French integers: word tables, magnitude composition and digit sequences.

pub(crate) mod helpers;
pub mod magnitude;
pub(crate) mod predicates;
pub mod rules;
pub mod tables;

#[cfg(test)]
mod tests;
