//! Concrete cell, converter and aging models.

pub mod cell;
pub mod converter;
pub mod degradation;
