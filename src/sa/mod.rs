//! Simulated Annealing (SA).
//!
//! A single-trajectory metaheuristic that accepts worsening swaps with
//! a probability decreasing over time (temperature), letting the search
//! escape local optima early and settle later. This variant cools
//! geometrically every step and can reheat after prolonged stagnation,
//! optionally re-diversifying from the best state found so far.
//!
//! # References
//!
//! - Kirkpatrick, Gelatt & Vecchi (1983), "Optimization by Simulated Annealing"
//! - Cerny (1985), "Thermodynamical Approach to the Travelling Salesman Problem"

mod config;
mod runner;

pub use config::{ReheatConfig, SaConfig};
pub use runner::{acceptance_probability, SaResult, SaRunner};
