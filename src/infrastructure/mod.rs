pub mod log_redact;
pub mod logging;
pub mod wallet_file;

pub use wallet_file::WalletFile;
