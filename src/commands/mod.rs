pub mod ci_init;
pub mod config;
pub mod deploy;
pub mod flow;
pub mod push;
pub mod to_main;
pub mod to_test;
