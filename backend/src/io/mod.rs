//! # IO Module
//!
//! External interfaces of the backend. Only REST today.

pub mod rest;
