pub mod controls;
pub mod debug;
