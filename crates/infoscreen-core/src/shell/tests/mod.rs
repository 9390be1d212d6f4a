pub mod activation_tests;
pub mod command_tests;
