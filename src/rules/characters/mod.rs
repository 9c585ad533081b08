//! Spelled characters: NATO letters (optionally "majuscule"), digit names
//! and symbol names, alone or joined into short series.

pub mod rules;
pub mod tables;
