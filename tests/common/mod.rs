#![allow(dead_code)]

pub mod mock_workers;
pub mod strategies;

pub use mock_workers::*;
pub use strategies::*;
