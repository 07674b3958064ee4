pub mod config_io;
pub mod logging;
pub mod recovery;
pub mod slots;
pub mod storage;
