//! BIP32 分层确定性私钥派生（secp256k1）
//!
//! 主密钥与 CKDpriv 由 `coins_bip32::XPriv` 完成；本模块在其上提供
//! 路径分量类型、路径解析以及 Bismuth 需要的错误语义。
//!
//! 只做私钥派生，不提供 xprv/xpub 序列化。

use std::fmt;
use std::str::FromStr;

use coins_bip32::prelude::{Parent, XKeyInfo, XPriv};
use k256::ecdsa::SigningKey;
use k256::SecretKey;
use zeroize::Zeroizing;

use crate::error::{WalletError, WalletResult};

/// 硬化索引偏移（2^31）
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// 派生路径分量：31 位索引 + 是否硬化
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChildIndex {
    index: u32,
    hardened: bool,
}

impl ChildIndex {
    /// 普通（非硬化）分量
    pub fn normal(index: u32) -> WalletResult<Self> {
        Self::checked(index, false)
    }

    /// 硬化分量
    pub fn hardened(index: u32) -> WalletResult<Self> {
        Self::checked(index, true)
    }

    /// 由带硬化位的原始 32 位索引构造
    pub fn from_raw(raw: u32) -> Self {
        Self {
            index: raw & !HARDENED_OFFSET,
            hardened: raw & HARDENED_OFFSET != 0,
        }
    }

    fn checked(index: u32, hardened: bool) -> WalletResult<Self> {
        if index >= HARDENED_OFFSET {
            return Err(WalletError::InvalidPath(format!(
                "child index {} exceeds 2^31 - 1",
                index
            )));
        }
        Ok(Self { index, hardened })
    }

    pub fn index(&self) -> u32 {
        self.index
    }

    pub fn is_hardened(&self) -> bool {
        self.hardened
    }

    /// HMAC 输入中使用的 32 位索引（硬化时置最高位）
    pub fn raw(&self) -> u32 {
        if self.hardened {
            self.index | HARDENED_OFFSET
        } else {
            self.index
        }
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.hardened {
            write!(f, "{}'", self.index)
        } else {
            write!(f, "{}", self.index)
        }
    }
}

impl FromStr for ChildIndex {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix('\'').or_else(|| s.strip_suffix('h')) {
            Some(d) => (d, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(WalletError::InvalidPath(format!(
                "invalid path component '{}'",
                s
            )));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| WalletError::InvalidPath(format!("index out of range: '{}'", s)))?;
        Self::checked(index, hardened)
    }
}

/// 从主密钥出发的有序分量序列
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    pub fn new(components: Vec<ChildIndex>) -> Self {
        Self(components)
    }

    pub fn components(&self) -> &[ChildIndex] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 追加一个分量，返回新路径
    pub fn child(&self, component: ChildIndex) -> Self {
        let mut components = self.0.clone();
        components.push(component);
        Self(components)
    }
}

impl From<Vec<ChildIndex>> for DerivationPath {
    fn from(components: Vec<ChildIndex>) -> Self {
        Self(components)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for component in &self.0 {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        if parts.next() != Some("m") {
            return Err(WalletError::InvalidPath(
                "path must start with 'm'".to_string(),
            ));
        }
        parts
            .map(ChildIndex::from_str)
            .collect::<WalletResult<Vec<_>>>()
            .map(Self)
    }
}

/// 扩展私钥
///
/// 深度、子索引和父指纹由内部 `XKeyInfo` 携带
#[derive(Clone)]
pub struct ExtendedKey {
    inner: XPriv,
}

impl ExtendedKey {
    fn info(&self) -> &XKeyInfo {
        AsRef::<XKeyInfo>::as_ref(&self.inner)
    }

    pub fn signing_key(&self) -> &SigningKey {
        AsRef::<SigningKey>::as_ref(&self.inner)
    }

    pub fn secret_key(&self) -> SecretKey {
        SecretKey::from(self.signing_key())
    }

    pub fn private_key_bytes(&self) -> Zeroizing<[u8; 32]> {
        let mut out = Zeroizing::new([0u8; 32]);
        out.copy_from_slice(&self.signing_key().to_bytes());
        out
    }

    pub fn chain_code(&self) -> &[u8; 32] {
        &self.info().chain_code.0
    }

    pub fn depth(&self) -> u8 {
        self.info().depth
    }

    /// 原始子索引（含硬化位），主密钥为 0
    pub fn child_index(&self) -> u32 {
        self.info().index
    }

    pub fn parent_fingerprint(&self) -> [u8; 4] {
        self.info().parent.0
    }

    /// 33 字节压缩公钥
    pub fn public_key_bytes(&self) -> [u8; 33] {
        let point = self.signing_key().verifying_key().to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// HASH160(压缩公钥) 的前 4 字节
    pub fn fingerprint(&self) -> [u8; 4] {
        self.inner.fingerprint().0
    }

    pub fn derive_child(&self, component: ChildIndex) -> WalletResult<ExtendedKey> {
        derive_child(self, component)
    }

    pub fn derive_path(&self, path: &DerivationPath) -> WalletResult<ExtendedKey> {
        path.components()
            .iter()
            .try_fold(self.clone(), |key, component| key.derive_child(*component))
    }
}

impl fmt::Debug for ExtendedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtendedKey")
            .field("depth", &self.depth())
            .field("child_index", &ChildIndex::from_raw(self.child_index()))
            .field("parent_fingerprint", &hex::encode(self.parent_fingerprint()))
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// 从种子构造主扩展私钥
///
/// 种子不足 16 字节，或 IL 为 0 / 不小于 n 时返回 `InvalidSeed`
pub fn master_key(seed: &[u8]) -> WalletResult<ExtendedKey> {
    let inner = XPriv::root_from_seed(seed, None).map_err(|e| {
        tracing::debug!(error = %e, "Master key derivation failed");
        WalletError::InvalidSeed
    })?;
    Ok(ExtendedKey { inner })
}

/// 子私钥派生（CKDpriv）
///
/// IL >= n 或子私钥为 0 时返回 `InvalidDerivation`，不会改用下一个索引
pub fn derive_child(parent: &ExtendedKey, component: ChildIndex) -> WalletResult<ExtendedKey> {
    let raw = component.raw();
    let invalid = || WalletError::InvalidDerivation { index: raw };

    if parent.depth() == u8::MAX {
        return Err(invalid());
    }

    let inner = parent.inner.derive_child(raw).map_err(|e| {
        tracing::debug!(error = %e, index = raw, "Child key derivation failed");
        invalid()
    })?;

    // XPriv 遇到无效 IL 时会静默跳到 i+1
    if AsRef::<XKeyInfo>::as_ref(&inner).index != raw {
        return Err(invalid());
    }

    Ok(ExtendedKey { inner })
}

/// 从种子沿路径派生
pub fn derive_path(seed: &[u8], path: &DerivationPath) -> WalletResult<ExtendedKey> {
    master_key(seed)?.derive_path(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    // BIP32 测试向量 1
    const TV1_SEED: &str = "000102030405060708090a0b0c0d0e0f";

    fn tv1_master() -> ExtendedKey {
        master_key(&hex::decode(TV1_SEED).unwrap()).unwrap()
    }

    #[test]
    fn test_bip32_vector1_master() {
        let master = tv1_master();
        assert_eq!(
            hex::encode(&master.private_key_bytes()[..]),
            "e8f32e723decf4051aefac8e2c93c9c5b214313817cdb01a1494b917c8436b35"
        );
        assert_eq!(
            hex::encode(master.chain_code()),
            "873dff81c02f525623fd1fe5167eac3a55a049de3d314bb42ee227ffed37d508"
        );
        assert_eq!(
            hex::encode(master.public_key_bytes()),
            "0339a36013301597daef41fbe593a02cc513d0b55527ec2df1050e2e8ff49c85c2"
        );
        assert_eq!(master.depth(), 0);
        assert_eq!(hex::encode(master.fingerprint()), "3442193e");
    }

    #[test]
    fn test_bip32_vector1_hardened_child() {
        let child = tv1_master()
            .derive_child(ChildIndex::hardened(0).unwrap())
            .unwrap();
        assert_eq!(
            hex::encode(&child.private_key_bytes()[..]),
            "edb2e14f9ee77d26dd93b4ecede8d16ed408ce149b6cd80b0715a2d911a0afea"
        );
        assert_eq!(
            hex::encode(child.chain_code()),
            "47fdacbd0f1097043b78c63c20c34ef4ed9a111d980047ad16282c7ae6236141"
        );
        assert_eq!(
            hex::encode(child.public_key_bytes()),
            "035a784662a4a20a65bf6aab9ae98a6c068a81c52e4b032c0fb5400c706cfccc56"
        );
        assert_eq!(child.depth(), 1);
        assert_eq!(child.child_index(), HARDENED_OFFSET);
        assert_eq!(hex::encode(child.parent_fingerprint()), "3442193e");
    }

    #[test]
    fn test_bip32_vector1_normal_child() {
        let path: DerivationPath = "m/0'/1".parse().unwrap();
        let key = derive_path(&hex::decode(TV1_SEED).unwrap(), &path).unwrap();
        assert_eq!(
            hex::encode(&key.private_key_bytes()[..]),
            "3c6cb8d0f6a264c91ea8b5030fadaa8e538b020f0a387421a12de9319dc93368"
        );
        assert_eq!(
            hex::encode(key.chain_code()),
            "2a7857631386ba23dacac34180dd1983734e444fdbf774041578e9b6adb37c19"
        );
        assert_eq!(
            hex::encode(key.public_key_bytes()),
            "03501e454bf00751f24b1b489aa925215d66af2234e3891c3b21a52bedb3cd711c"
        );
        assert_eq!(key.depth(), 2);
        assert_eq!(key.child_index(), 1);
    }

    #[test]
    fn test_hardened_and_normal_differ() {
        let master = tv1_master();
        let hardened = master.derive_child(ChildIndex::hardened(7).unwrap()).unwrap();
        let normal = master.derive_child(ChildIndex::normal(7).unwrap()).unwrap();
        assert_ne!(hardened.private_key_bytes(), normal.private_key_bytes());
    }

    #[test]
    fn test_path_parse_and_display() {
        let path: DerivationPath = "m/44'/209'/0'/0/5".parse().unwrap();
        assert_eq!(path.len(), 5);
        assert!(path.components()[0].is_hardened());
        assert_eq!(path.components()[1].index(), 209);
        assert!(!path.components()[3].is_hardened());
        assert_eq!(path.to_string(), "m/44'/209'/0'/0/5");

        let h: DerivationPath = "m/44h/209h/0h/0/5".parse().unwrap();
        assert_eq!(h, path);

        let root: DerivationPath = "m".parse().unwrap();
        assert!(root.is_empty());
        assert_eq!(root.to_string(), "m");
    }

    #[test]
    fn test_path_parse_errors() {
        for bad in ["", "44'/0", "m/", "m/x", "m/1''", "m/-1", "m/2147483648", "m/4294967296'"] {
            assert!(
                matches!(bad.parse::<DerivationPath>(), Err(WalletError::InvalidPath(_))),
                "expected InvalidPath for {:?}",
                bad
            );
        }
    }

    #[test]
    fn test_child_index_raw() {
        assert_eq!(ChildIndex::hardened(44).unwrap().raw(), 44 | HARDENED_OFFSET);
        assert_eq!(ChildIndex::normal(44).unwrap().raw(), 44);
        assert_eq!(ChildIndex::from_raw(0x8000_002c), ChildIndex::hardened(44).unwrap());
        assert!(ChildIndex::normal(HARDENED_OFFSET).is_err());
    }

    #[test]
    fn test_short_seed_rejected() {
        assert!(matches!(master_key(&[0u8; 8]), Err(WalletError::InvalidSeed)));
    }

    #[test]
    fn test_secret_key_matches_bytes() {
        let key = tv1_master();
        assert_eq!(key.secret_key().to_bytes()[..], key.private_key_bytes()[..]);
    }

    #[test]
    fn test_debug_is_redacted() {
        let rendered = format!("{:?}", tv1_master());
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("e8f32e72"));
    }
}
