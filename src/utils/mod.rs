// src/utils/mod.rs

pub mod json;
pub mod scope;
