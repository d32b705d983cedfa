pub mod archiver;
pub mod confirmation;
pub mod discovery;
pub mod guard;
pub mod inspector;
pub mod permissions;
pub mod prober;
pub mod uninstaller;
