//! 种子派生模块
//! BIP39: PBKDF2-HMAC-SHA512(NFKD(助记词), "mnemonic" + NFKD(密码短语), 2048)，
//! 由 `bip39::Mnemonic::to_seed` 计算

use std::fmt;

use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::mnemonic::{self, ChecksumPolicy};
use crate::error::WalletResult;

pub const SEED_LEN: usize = 64;

/// 64 字节种子，离开作用域时清零
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Seed([u8; SEED_LEN]);

impl Seed {
    pub fn from_bytes(bytes: [u8; SEED_LEN]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SEED_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl AsRef<[u8]> for Seed {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for Seed {
    fn eq(&self, other: &Self) -> bool {
        self.0[..].ct_eq(&other.0[..]).into()
    }
}

impl Eq for Seed {}

impl fmt::Debug for Seed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Seed(<redacted>)")
    }
}

/// 从助记词派生种子（宽松校验）
///
/// # Arguments
/// * `mnemonic` - 原始助记词，会先经过规范化和校验
/// * `passphrase` - 可选密码短语，空串表示无
pub fn derive_seed(mnemonic: &str, passphrase: &str) -> WalletResult<Seed> {
    derive_seed_with_policy(mnemonic, passphrase, ChecksumPolicy::Lenient)
}

/// 按指定校验策略派生种子
pub fn derive_seed_with_policy(
    mnemonic: &str,
    passphrase: &str,
    policy: ChecksumPolicy,
) -> WalletResult<Seed> {
    let (_, parsed) = mnemonic::parse_with_policy(mnemonic, policy)?;

    // to_seed 内部对密码短语做 NFKD
    let mut bytes = parsed.to_seed(passphrase);
    let seed = Seed(bytes);
    bytes.zeroize();
    Ok(seed)
}
