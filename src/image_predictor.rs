mod dispatch;
pub mod interface;
pub mod main;
