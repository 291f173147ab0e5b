//! bismuth-hd - Bismuth 分层确定性钱包工具库
//!
//! BIP39 助记词 + BIP32 派生（m/44'/209'/0'/0/i）+ Bismuth Base58Check 地址。
//! 纯计算库，不做网络访问，不持久化任何密钥材料（钱包文件除外）。

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod utils;

// 重新导出常用类型
pub use domain::derivation::{
    check_mnemonic, derive_addresses, generate_mnemonic, mnemonic_to_seed, AddressRecord,
    DeriveOptions, Deriver,
};
pub use domain::seed::Seed;
pub use error::{WalletError, WalletErrorCode, WalletResult};

pub mod prelude {
    pub use crate::{
        config::Config,
        domain::{ChecksumPolicy, DerivationPath, DerivationPathValidator, KeyPair},
        error::{WalletError, WalletResult},
        AddressRecord, DeriveOptions, Deriver, Seed,
    };
}
