//! Host resources the program processor inspects and changes: files under a
//! user's home and the system package manager.
pub mod package;
pub mod probe;
