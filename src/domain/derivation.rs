//! 地址派生编排
//!
//! 助记词 → 种子 → m/44'/209'/0'/0 → 每个索引一个子密钥 → 地址记录。
//! 账户级密钥只派生一次；窗口较大时按块分配到作用域线程并行派生，
//! 最后按索引稳定排序，保证输出与顺序派生一致。

use std::fmt;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::config::DerivationConfig;
use crate::domain::address::KeyPair;
use crate::domain::derivation_path_validator::DerivationPathValidator;
use crate::domain::hd_key::{self, ChildIndex, ExtendedKey, HARDENED_OFFSET};
use crate::domain::mnemonic::{self, ChecksumPolicy};
use crate::domain::seed::{self, Seed};
use crate::error::{WalletError, WalletResult};
use crate::infrastructure::log_redact::{redact_address, redact_hex_string};

/// 派生结果（对外唯一的输出单元）
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressRecord {
    /// Bis1... 地址
    pub address: String,
    /// 私钥 (hex)
    pub private_key: String,
    /// 压缩公钥 (hex)
    pub public_key: String,
    /// 派生路径
    pub derivation_path: String,
}

impl fmt::Debug for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AddressRecord")
            .field("address", &self.address)
            .field("private_key", &redact_hex_string(&self.private_key, 4))
            .field("public_key", &self.public_key)
            .field("derivation_path", &self.derivation_path)
            .finish()
    }
}

/// 派生选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeriveOptions {
    pub checksum_policy: ChecksumPolicy,
    /// 窗口小于该值时不启用工作线程
    pub parallel_threshold: u32,
    pub max_workers: usize,
}

impl Default for DeriveOptions {
    fn default() -> Self {
        Self {
            checksum_policy: ChecksumPolicy::Lenient,
            parallel_threshold: 16,
            max_workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
        }
    }
}

impl From<&DerivationConfig> for DeriveOptions {
    fn from(config: &DerivationConfig) -> Self {
        Self {
            checksum_policy: config.checksum_policy,
            parallel_threshold: config.parallel_threshold,
            max_workers: config.max_workers.max(1),
        }
    }
}

/// 地址派生器
#[derive(Debug, Clone, Default)]
pub struct Deriver {
    options: DeriveOptions,
}

impl Deriver {
    pub fn new(options: DeriveOptions) -> Self {
        Self { options }
    }

    pub fn from_config(config: &DerivationConfig) -> Self {
        Self::new(config.into())
    }

    pub fn options(&self) -> &DeriveOptions {
        &self.options
    }

    /// 校验并规范化助记词
    pub fn check_mnemonic(&self, raw: &str) -> WalletResult<String> {
        Ok(mnemonic::validate_with_policy(raw, self.options.checksum_policy)?.phrase)
    }

    pub fn mnemonic_to_seed(&self, mnemonic: &str, passphrase: &str) -> WalletResult<Seed> {
        seed::derive_seed_with_policy(mnemonic, passphrase, self.options.checksum_policy)
    }

    /// 派生 [start, start + count) 范围内的地址，按索引升序返回
    pub fn derive_addresses(
        &self,
        mnemonic: &str,
        passphrase: &str,
        start: u32,
        count: u32,
    ) -> WalletResult<Vec<AddressRecord>> {
        let window = index_window(start, count)?;
        let seed = self.mnemonic_to_seed(mnemonic, passphrase)?;
        if window.is_empty() {
            return Ok(Vec::new());
        }

        let account = account_key(&seed)?;
        drop(seed);

        tracing::debug!(start, count, "Deriving Bismuth addresses");
        let records = self.derive_window(&account, window)?;
        if let (Some(first), Some(last)) = (records.first(), records.last()) {
            tracing::debug!(
                first = %redact_address(&first.address),
                last = %redact_address(&last.address),
                "Derived {} addresses",
                records.len()
            );
        }
        Ok(records)
    }

    /// 派生单个索引
    pub fn derive_address_at(
        &self,
        mnemonic: &str,
        passphrase: &str,
        index: u32,
    ) -> WalletResult<AddressRecord> {
        self.derive_addresses(mnemonic, passphrase, index, 1)?
            .pop()
            .ok_or_else(|| WalletError::InvalidPath(format!("no record for index {}", index)))
    }

    /// 按路径字符串派生，路径必须符合 Bismuth 策略
    pub fn derive_at_path(
        &self,
        mnemonic: &str,
        passphrase: &str,
        path: &str,
    ) -> WalletResult<AddressRecord> {
        let index = DerivationPathValidator::validate_path_str(path)?;
        self.derive_address_at(mnemonic, passphrase, index)
    }

    fn derive_window(
        &self,
        account: &ExtendedKey,
        window: Range<u32>,
    ) -> WalletResult<Vec<AddressRecord>> {
        let len = window.len();
        let workers = self.options.max_workers.min(len).max(1);
        if workers == 1 || (len as u32) < self.options.parallel_threshold {
            return window.map(|i| address_record(account, i)).collect();
        }

        let chunk_size = len.div_ceil(workers);
        let indices: Vec<u32> = window.collect();

        let chunks: Vec<WalletResult<Vec<(u32, AddressRecord)>>> = std::thread::scope(|s| {
            let handles: Vec<_> = indices
                .chunks(chunk_size)
                .map(|chunk| {
                    s.spawn(move || {
                        chunk
                            .iter()
                            .map(|&i| address_record(account, i).map(|r| (i, r)))
                            .collect::<WalletResult<Vec<_>>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| match h.join() {
                    Ok(result) => result,
                    Err(panic) => std::panic::resume_unwind(panic),
                })
                .collect()
        });

        let mut indexed = Vec::with_capacity(len);
        for chunk in chunks {
            indexed.extend(chunk?);
        }
        indexed.sort_by_key(|(i, _)| *i);

        Ok(indexed.into_iter().map(|(_, record)| record).collect())
    }
}

/// [start, start + count)，不得超出非硬化索引范围
fn index_window(start: u32, count: u32) -> WalletResult<Range<u32>> {
    match start.checked_add(count) {
        Some(end) if end <= HARDENED_OFFSET => Ok(start..end),
        _ => Err(WalletError::InvalidPath(format!(
            "address window {}+{} exceeds non-hardened index range",
            start, count
        ))),
    }
}

/// m/44'/209'/0'/0
fn account_key(seed: &Seed) -> WalletResult<ExtendedKey> {
    hd_key::derive_path(seed.as_ref(), &DerivationPathValidator::account_path())
}

fn address_record(account: &ExtendedKey, index: u32) -> WalletResult<AddressRecord> {
    let child = account.derive_child(ChildIndex::normal(index)?)?;
    let keypair = KeyPair::from_secret(child.secret_key());

    Ok(AddressRecord {
        address: keypair.address(),
        private_key: keypair.private_key_hex(),
        public_key: keypair.public_key_hex(),
        derivation_path: DerivationPathValidator::path_string(index),
    })
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// 默认入口
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// 生成 128 位（12 词）或 256 位（24 词）助记词
pub fn generate_mnemonic(strength: u32) -> WalletResult<String> {
    mnemonic::generate(strength)
}

/// 校验并返回规范化后的助记词
pub fn check_mnemonic(raw: &str) -> WalletResult<String> {
    Deriver::default().check_mnemonic(raw)
}

pub fn mnemonic_to_seed(mnemonic: &str, passphrase: &str) -> WalletResult<Seed> {
    Deriver::default().mnemonic_to_seed(mnemonic, passphrase)
}

pub fn derive_addresses(
    mnemonic: &str,
    passphrase: &str,
    start: u32,
    count: u32,
) -> WalletResult<Vec<AddressRecord>> {
    Deriver::default().derive_addresses(mnemonic, passphrase, start, count)
}
