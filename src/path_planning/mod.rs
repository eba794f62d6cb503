// Path Planning algorithms module

pub mod lattice;

pub use lattice::*;
