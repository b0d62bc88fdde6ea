#![warn(missing_docs)]

//! Core library for actmenu => See `actmenu` crate.
//!
//! Contains the menu model, its placement logic and the contracts to the host screen.

/// Contains the [MenuConfig](config::MenuConfig) struct and its loading.
pub mod config;

/// Contains the error types.
pub mod error;

/// Contains the menu, its entries, strips and projections.
pub mod menu;

/// Contains the deferred task scheduling used for surrogate updates.
pub mod tasks;
