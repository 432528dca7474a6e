pub mod board;
pub mod constants;
pub mod input;
pub mod room;
pub mod snake;
pub mod types;
