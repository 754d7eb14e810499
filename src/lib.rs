#[allow(non_snake_case)]
pub mod Convergence;
#[allow(non_snake_case)]
pub mod Diffusion;
#[allow(non_snake_case)]
pub mod Examples;
#[allow(non_snake_case)]
pub mod Scenarios;
#[allow(non_snake_case)]
pub mod Solver;
#[allow(non_snake_case)]
pub mod Utils;
pub mod cli;
