// Test modules
pub mod api_tests;
