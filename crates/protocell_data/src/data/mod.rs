//! Core data structures for the Protocell simulation.

pub mod brain;
pub mod entity;
pub mod food;
pub mod genome;
