pub mod crypto;
pub mod fs;
pub mod version;
