//! Integration tests module
//!
//! This module organizes all integration tests for the r-watchcli application.

// Import individual test modules
pub mod client_test;
pub mod config_test;
pub mod session_test;
