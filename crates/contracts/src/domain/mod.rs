pub mod common;

pub mod a001_cake;
