//! Real x86 backends for the keyboard port, interrupt line and delay seams.

pub mod pic;
pub mod pit;
pub mod ps2;
