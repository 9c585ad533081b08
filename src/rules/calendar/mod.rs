//! Dates and times: relative day phrases, weekdays, absolute dates with
//! year inference, and military or "heures" times.

pub(crate) mod predicates;
pub mod resolve;
pub mod rules;
pub mod tables;
