//! BIP44 派生路径策略
//!
//! Bismuth 固定使用 m/44'/209'/0'/0/address_index，
//! 前三级硬化，change 与 address_index 不硬化

use crate::domain::hd_key::{ChildIndex, DerivationPath, HARDENED_OFFSET};
use crate::error::{WalletError, WalletResult};

/// BIP44 purpose
pub const PURPOSE: u32 = 44;
/// Bismuth SLIP-44 coin type
pub const COIN_TYPE: u32 = 209;
pub const ACCOUNT: u32 = 0;
/// 外部地址链
pub const CHANGE: u32 = 0;

/// 派生路径验证器
pub struct DerivationPathValidator;

impl DerivationPathValidator {
    /// 账户级路径 m/44'/209'/0'/0，所有地址共享
    pub fn account_path() -> DerivationPath {
        DerivationPath::new(vec![
            ChildIndex::from_raw(PURPOSE | HARDENED_OFFSET),
            ChildIndex::from_raw(COIN_TYPE | HARDENED_OFFSET),
            ChildIndex::from_raw(ACCOUNT | HARDENED_OFFSET),
            ChildIndex::from_raw(CHANGE),
        ])
    }

    /// 构建派生路径
    ///
    /// # Arguments
    /// * `address_index` - 地址索引，必须小于 2^31
    pub fn build_path(address_index: u32) -> WalletResult<DerivationPath> {
        Ok(Self::account_path().child(ChildIndex::normal(address_index)?))
    }

    /// 路径字符串，如 m/44'/209'/0'/0/7
    pub fn path_string(address_index: u32) -> String {
        format!(
            "m/{}'/{}'/{}'/{}/{}",
            PURPOSE, COIN_TYPE, ACCOUNT, CHANGE, address_index
        )
    }

    /// 验证路径符合 Bismuth 策略，返回地址索引
    pub fn validate_path(path: &DerivationPath) -> WalletResult<u32> {
        let components = path.components();
        if components.len() != 5 {
            return Err(WalletError::InvalidPath(format!(
                "expected 5 components (m/purpose'/coin_type'/account'/change/index), got {}",
                components.len()
            )));
        }

        let expected = Self::account_path();
        for (position, (actual, wanted)) in components
            .iter()
            .zip(expected.components())
            .enumerate()
        {
            if actual != wanted {
                return Err(WalletError::InvalidPath(format!(
                    "component {} must be {}, got {}",
                    position + 1,
                    wanted,
                    actual
                )));
            }
        }

        let leaf = components[4];
        if leaf.is_hardened() {
            return Err(WalletError::InvalidPath(
                "address index must not be hardened".to_string(),
            ));
        }

        Ok(leaf.index())
    }

    /// 解析并验证路径字符串
    pub fn validate_path_str(path: &str) -> WalletResult<u32> {
        Self::validate_path(&path.parse()?)
    }
}
