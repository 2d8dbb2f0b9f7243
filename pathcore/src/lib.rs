#![cfg_attr(not(test), no_std)]

pub mod constraint;
pub mod orientation;
pub mod pose;
pub mod utils;
