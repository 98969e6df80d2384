//! This crate provides an optimal solver for the 4x4 sliding-tile puzzle
//! (15-puzzle) using Iterative-Deepening A* with a Manhattan-distance
//! heuristic.
//!
//! The goal layout places value `p` at cell `p`, with 0 as the blank.

pub mod board;
pub mod solver;
