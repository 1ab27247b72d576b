#![no_std]

mod filter;
mod limits;

pub use filter::*;
pub use limits::*;
