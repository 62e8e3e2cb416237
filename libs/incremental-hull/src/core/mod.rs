//! Core value types shared by the hull modules.

pub mod vec3;
