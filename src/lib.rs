//! Warband - Mercenary Company Battles and Campaign

pub mod battle;
pub mod campaign;
pub mod combat;
pub mod core;
pub mod persist;
