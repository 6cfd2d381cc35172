//! Atrium
//!
//! Atrium picks the real-estate portfolio with the highest net present value that
//! fits a purchase budget, and values the bullet loan that finances part of it.
//!
//! The selection is an exact bounded knapsack: each opportunity may be bought a
//! limited number of times, forced purchases are honoured first, and a
//! depth-first branch-and-bound search proves the best use of what is left.

pub mod assembler;
pub mod catalog;
pub mod config;
pub mod constraints;
pub mod financing;
pub mod fixtures;
pub mod holdings;
pub mod opportunities;
pub mod optimizer;
pub mod prelude;
pub mod resolver;
pub mod scenario;
pub mod slots;
pub mod solvers;
pub mod statement;
pub mod utils;
