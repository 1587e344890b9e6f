//! Session state and the manager that owns it.
//!
//! DESIGN
//! ======
//! `session` is the plain snapshot handed to consumers; `manager` is the
//! only code that mutates it.

pub mod manager;
pub mod session;
