pub mod scaling_examples;
