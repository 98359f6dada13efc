//! jwatch - watch remote agent sessions from the terminal

pub mod cli;
pub mod config;
pub mod monitor;
pub mod session;
