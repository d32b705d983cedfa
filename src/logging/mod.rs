pub mod audit;
pub mod init;
