//! 钱包文件持久化
//!
//! 文件格式：`{"mnemonic": "<助记词>"}`。核心派生逻辑不依赖本模块。
//! unix 下文件以 0600 权限创建。

use std::fs;
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::domain::mnemonic::{self, ChecksumPolicy};
use crate::error::{WalletError, WalletResult};

#[derive(Clone, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct WalletFile {
    pub mnemonic: String,
}

impl std::fmt::Debug for WalletFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WalletFile")
            .field(
                "mnemonic",
                &crate::infrastructure::log_redact::redact_mnemonic(&self.mnemonic),
            )
            .finish()
    }
}

impl WalletFile {
    /// 读取并校验钱包文件
    pub fn load(path: &Path, policy: ChecksumPolicy) -> WalletResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            WalletError::WalletFile(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut wallet: WalletFile = serde_json::from_str(&content).map_err(|e| {
            WalletError::WalletFile(format!("failed to parse {}: {}", path.display(), e))
        })?;

        let normalized = mnemonic::validate_with_policy(&wallet.mnemonic, policy)?;
        wallet.mnemonic.zeroize();
        wallet.mnemonic = normalized.phrase;
        Ok(wallet)
    }

    pub fn save(&self, path: &Path) -> WalletResult<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| WalletError::WalletFile(format!("failed to serialize wallet: {}", e)))?;

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                WalletError::WalletFile(format!("failed to create {}: {}", parent.display(), e))
            })?;
        }
        write_private(path, json.as_bytes()).map_err(|e| {
            WalletError::WalletFile(format!("failed to write {}: {}", path.display(), e))
        })?;

        tracing::info!(path = %path.display(), "Wallet file saved");
        Ok(())
    }

    /// 文件存在则加载，否则生成新助记词并保存
    ///
    /// 返回值第二项表示是否为新建钱包
    pub fn load_or_create(
        path: &Path,
        strength: u32,
        policy: ChecksumPolicy,
    ) -> WalletResult<(Self, bool)> {
        if path.exists() {
            return Ok((Self::load(path, policy)?, false));
        }

        let wallet = WalletFile {
            mnemonic: mnemonic::generate(strength)?,
        };
        wallet.save(path)?;
        tracing::warn!(
            path = %path.display(),
            "Created new wallet; back up the mnemonic, it cannot be recovered"
        );
        Ok((wallet, true))
    }
}

/// 仅所有者可读写
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // mode 只作用于新建文件
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path)?;
    file.write_all(contents)?;
    file.sync_all()
}

#[cfg(test)]
mod tests {
    use tempfile::tempdir;

    use super::*;

    const ABANDON_ABOUT: &str = "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("wallet.json");

        let wallet = WalletFile {
            mnemonic: ABANDON_ABOUT.to_string(),
        };
        wallet.save(&path).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["mnemonic"], ABANDON_ABOUT);

        let loaded = WalletFile::load(&path, ChecksumPolicy::Strict).unwrap();
        assert_eq!(loaded.mnemonic, ABANDON_ABOUT);
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        let wallet = WalletFile {
            mnemonic: ABANDON_ABOUT.to_string(),
        };

        wallet.save(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        // 已存在的宽权限文件被覆盖后同样收紧
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();
        wallet.save(&path).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_load_normalizes_whitespace() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");
        let messy = format!("  {} \n", ABANDON_ABOUT.replace(' ', "  "));
        fs::write(&path, serde_json::json!({ "mnemonic": messy }).to_string()).unwrap();

        let loaded = WalletFile::load(&path, ChecksumPolicy::Lenient).unwrap();
        assert_eq!(loaded.mnemonic, ABANDON_ABOUT);
    }

    #[test]
    fn test_load_rejects_invalid() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        fs::write(&path, r#"{"mnemonic": "abandon abandon"}"#).unwrap();
        assert!(matches!(
            WalletFile::load(&path, ChecksumPolicy::Lenient),
            Err(WalletError::InvalidWordCount { found: 2 })
        ));

        fs::write(&path, "not json").unwrap();
        assert!(matches!(
            WalletFile::load(&path, ChecksumPolicy::Lenient),
            Err(WalletError::WalletFile(_))
        ));

        assert!(matches!(
            WalletFile::load(&dir.path().join("missing.json"), ChecksumPolicy::Lenient),
            Err(WalletError::WalletFile(_))
        ));
    }

    #[test]
    fn test_load_or_create() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("wallet.json");

        let (created, is_new) =
            WalletFile::load_or_create(&path, 256, ChecksumPolicy::Strict).unwrap();
        assert!(is_new);
        assert_eq!(created.mnemonic.split(' ').count(), 24);

        let (loaded, is_new) =
            WalletFile::load_or_create(&path, 256, ChecksumPolicy::Strict).unwrap();
        assert!(!is_new);
        assert_eq!(loaded.mnemonic, created.mnemonic);
    }

    #[test]
    fn test_debug_hides_mnemonic() {
        let wallet = WalletFile {
            mnemonic: ABANDON_ABOUT.to_string(),
        };
        let rendered = format!("{:?}", wallet);
        assert!(!rendered.contains("abandon"));
        assert!(rendered.contains("<12 words>"));
    }
}
