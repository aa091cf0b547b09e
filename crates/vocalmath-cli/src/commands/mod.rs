pub mod check;
pub mod generate;
pub mod init;
pub mod play;
pub mod resolve;
