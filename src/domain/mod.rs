//! Domain 模块
//!
//! 助记词、种子、BIP32 派生与 Bismuth 地址编码

pub mod address;
pub mod derivation;
pub mod derivation_path_validator;
pub mod hd_key;
pub mod mnemonic;
pub mod seed;
pub mod wordlist;

// 重新导出常用类型
pub use address::{
    decode_address, encode_address, encode_address_uncompressed, is_valid_address, KeyPair,
};
pub use derivation::{AddressRecord, DeriveOptions, Deriver};
pub use derivation_path_validator::DerivationPathValidator;
pub use hd_key::{ChildIndex, DerivationPath, ExtendedKey};
pub use mnemonic::{ChecksumPolicy, NormalizedMnemonic};
pub use seed::Seed;
