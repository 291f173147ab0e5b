//! 统一错误类型
//!
//! 所有派生流程的失败都以 `WalletError` 同步返回给调用方，不做重试

use thiserror::Error;

pub type WalletResult<T> = Result<T, WalletError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalletErrorCode {
    // 助记词
    InvalidStrength,
    InvalidWordCount,
    InvalidWords,
    InvalidChecksum,

    // 密钥派生
    InvalidSeed,
    InvalidDerivation,
    InvalidPath,

    // 地址
    InvalidAddressInput,
    InvalidAddress,

    // 外围
    WalletFile,
    Config,
}

impl WalletErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletErrorCode::InvalidStrength => "invalid_strength",
            WalletErrorCode::InvalidWordCount => "invalid_word_count",
            WalletErrorCode::InvalidWords => "invalid_words",
            WalletErrorCode::InvalidChecksum => "invalid_checksum",
            WalletErrorCode::InvalidSeed => "invalid_seed",
            WalletErrorCode::InvalidDerivation => "invalid_derivation",
            WalletErrorCode::InvalidPath => "invalid_path",
            WalletErrorCode::InvalidAddressInput => "invalid_address_input",
            WalletErrorCode::InvalidAddress => "invalid_address",
            WalletErrorCode::WalletFile => "wallet_file",
            WalletErrorCode::Config => "config",
        }
    }
}

#[derive(Debug, Error)]
pub enum WalletError {
    #[error("Invalid strength: {bits} bits (expected 128 or 256)")]
    InvalidStrength { bits: u32 },

    #[error("Invalid word count: found {found} words (expected 12, 18 or 24)")]
    InvalidWordCount { found: usize },

    #[error("Invalid words in mnemonic: {}", .words.join(", "))]
    InvalidWords { words: Vec<String> },

    #[error("Invalid mnemonic checksum")]
    InvalidChecksum,

    #[error("Invalid seed: master key out of curve range")]
    InvalidSeed,

    #[error("Invalid derivation at child index {index:#010x}")]
    InvalidDerivation { index: u32 },

    #[error("Invalid derivation path: {0}")]
    InvalidPath(String),

    #[error("Invalid private key for address encoding")]
    InvalidAddressInput,

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Wallet file error: {0}")]
    WalletFile(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl WalletError {
    pub fn code(&self) -> WalletErrorCode {
        match self {
            WalletError::InvalidStrength { .. } => WalletErrorCode::InvalidStrength,
            WalletError::InvalidWordCount { .. } => WalletErrorCode::InvalidWordCount,
            WalletError::InvalidWords { .. } => WalletErrorCode::InvalidWords,
            WalletError::InvalidChecksum => WalletErrorCode::InvalidChecksum,
            WalletError::InvalidSeed => WalletErrorCode::InvalidSeed,
            WalletError::InvalidDerivation { .. } => WalletErrorCode::InvalidDerivation,
            WalletError::InvalidPath(_) => WalletErrorCode::InvalidPath,
            WalletError::InvalidAddressInput => WalletErrorCode::InvalidAddressInput,
            WalletError::InvalidAddress(_) => WalletErrorCode::InvalidAddress,
            WalletError::WalletFile(_) => WalletErrorCode::WalletFile,
            WalletError::Config(_) => WalletErrorCode::Config,
        }
    }

    /// 是否属于助记词输入错误（调用方需修正输入）
    pub fn is_mnemonic_error(&self) -> bool {
        matches!(
            self.code(),
            WalletErrorCode::InvalidStrength
                | WalletErrorCode::InvalidWordCount
                | WalletErrorCode::InvalidWords
                | WalletErrorCode::InvalidChecksum
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            WalletError::InvalidWordCount { found: 11 }.code().as_str(),
            "invalid_word_count"
        );
        assert_eq!(
            WalletError::InvalidDerivation { index: 0 }.code(),
            WalletErrorCode::InvalidDerivation
        );
    }

    #[test]
    fn test_invalid_words_message_lists_words() {
        let err = WalletError::InvalidWords {
            words: vec!["notaword".to_string(), "qwerty".to_string()],
        };
        assert_eq!(err.to_string(), "Invalid words in mnemonic: notaword, qwerty");
        assert!(err.is_mnemonic_error());
        assert!(!WalletError::InvalidSeed.is_mnemonic_error());
    }
}
