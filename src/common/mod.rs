pub mod mention;
pub mod options;
pub mod reply;
