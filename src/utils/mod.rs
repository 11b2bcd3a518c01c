// src/utils/mod.rs

pub mod avatar;
pub mod hash;
pub mod html;
pub mod jwt;
