pub mod error;
pub mod executable_utils;
pub mod model;
pub mod scorers;
pub mod storage;
pub mod validation;
