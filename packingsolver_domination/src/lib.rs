// SPDX-License-Identifier: MIT

//! Generational node arena and domination-history utilities shared by every
//! branching scheme's frontier.
//!
//! This crate knows nothing about packing geometry: [`Arena`] stores
//! whatever node type a scheme defines, and [`History`] is generic over a
//! caller-supplied [`NodeHasher`]. Concrete branching schemes (in
//! `packingsolver_rectangle` and its siblings) plug their own frontier
//! hashing into both.

mod arena;
mod history;

pub use arena::{Arena, NodeKey};
pub use history::{History, NodeHasher};
