//! Entity Module

pub mod member;
pub mod session;
