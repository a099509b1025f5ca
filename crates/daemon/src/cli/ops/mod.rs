pub mod daemon;
pub mod fs;
pub mod health;
pub mod init;
pub mod version;

pub use daemon::Daemon;
pub use fs::Fs;
pub use health::Health;
pub use init::Init;
pub use version::Version;
