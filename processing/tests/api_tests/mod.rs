pub mod mocks;

mod validation_tests;
