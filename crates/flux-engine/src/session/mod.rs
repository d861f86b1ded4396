//! Session acquisition helpers backing the workbench and combat command
//! families (spec §4.6).

pub mod combat;
pub mod workbench;
