pub mod convert;
pub mod import;
pub mod init;
pub mod validate;
