//! Bismuth 地址编码
//!
//! 地址 = Base58(0x4F545B ‖ HASH160(压缩公钥) ‖ 校验和)，
//! 校验和取双 SHA-256 的前 4 字节，字母表与 Bitcoin 相同。
//! 派生流程只使用压缩公钥；未压缩形式（65 字节）供旧钱包兼容。

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::{FieldBytes, PublicKey, SecretKey};

use crate::error::{WalletError, WalletResult};
use crate::utils::hash;

/// Bismuth 主网前缀
pub const NETWORK_PREFIX: [u8; 3] = [0x4F, 0x54, 0x5B];

const HASH_LEN: usize = 20;
const PAYLOAD_LEN: usize = NETWORK_PREFIX.len() + HASH_LEN;
const CHECKSUM_LEN: usize = 4;
const DECODED_LEN: usize = PAYLOAD_LEN + CHECKSUM_LEN;

/// secp256k1 密钥对
#[derive(Clone)]
pub struct KeyPair {
    secret: SecretKey,
    public: PublicKey,
}

impl KeyPair {
    /// 私钥必须是 [1, n-1] 内的 32 字节值
    pub fn from_private_bytes(bytes: &[u8]) -> WalletResult<Self> {
        if bytes.len() != 32 {
            return Err(WalletError::InvalidAddressInput);
        }
        let secret = SecretKey::from_bytes(FieldBytes::from_slice(bytes))
            .map_err(|_| WalletError::InvalidAddressInput)?;
        Ok(Self::from_secret(secret))
    }

    pub fn from_secret(secret: SecretKey) -> Self {
        let public = secret.public_key();
        Self { secret, public }
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public
    }

    /// 33 字节压缩公钥
    pub fn public_key_bytes(&self) -> [u8; 33] {
        let point = self.public.to_encoded_point(true);
        let mut out = [0u8; 33];
        out.copy_from_slice(point.as_bytes());
        out
    }

    /// 65 字节未压缩公钥（0x04 ‖ x ‖ y）
    pub fn uncompressed_public_key_bytes(&self) -> [u8; 65] {
        let point = self.public.to_encoded_point(false);
        let mut out = [0u8; 65];
        out.copy_from_slice(point.as_bytes());
        out
    }

    pub fn private_key_hex(&self) -> String {
        hex::encode(self.secret.to_bytes())
    }

    pub fn public_key_hex(&self) -> String {
        hex::encode(self.public_key_bytes())
    }

    pub fn address(&self) -> String {
        address_from_public_key(&self.public_key_bytes())
    }

    /// 按指定公钥形式编码地址
    pub fn address_with(&self, compressed: bool) -> String {
        if compressed {
            self.address()
        } else {
            encode_public_key(&self.uncompressed_public_key_bytes())
        }
    }
}

/// 由私钥字节编码地址
pub fn encode_address(private_key: &[u8]) -> WalletResult<String> {
    Ok(KeyPair::from_private_bytes(private_key)?.address())
}

/// 由私钥字节编码地址，公钥取未压缩形式
pub fn encode_address_uncompressed(private_key: &[u8]) -> WalletResult<String> {
    Ok(KeyPair::from_private_bytes(private_key)?.address_with(false))
}

/// 由 33 字节压缩公钥编码地址
pub fn address_from_public_key(compressed: &[u8; 33]) -> String {
    encode_public_key(compressed)
}

fn encode_public_key(public_key: &[u8]) -> String {
    let mut data = Vec::with_capacity(DECODED_LEN);
    data.extend_from_slice(&NETWORK_PREFIX);
    data.extend_from_slice(&hash::hash160(public_key));
    let checksum = hash::checksum4(&data);
    data.extend_from_slice(&checksum);

    bs58::encode(data).into_string()
}

/// 解码地址并返回 20 字节公钥哈希
pub fn decode_address(address: &str) -> WalletResult<[u8; HASH_LEN]> {
    let decoded = bs58::decode(address)
        .into_vec()
        .map_err(|e| WalletError::InvalidAddress(format!("base58: {}", e)))?;

    if decoded.len() != DECODED_LEN {
        return Err(WalletError::InvalidAddress(format!(
            "expected {} bytes, got {}",
            DECODED_LEN,
            decoded.len()
        )));
    }

    let (payload, checksum) = decoded.split_at(PAYLOAD_LEN);
    if payload[..NETWORK_PREFIX.len()] != NETWORK_PREFIX {
        return Err(WalletError::InvalidAddress("unknown network prefix".to_string()));
    }
    if checksum != hash::checksum4(payload) {
        return Err(WalletError::InvalidAddress("checksum mismatch".to_string()));
    }

    let mut out = [0u8; HASH_LEN];
    out.copy_from_slice(&payload[NETWORK_PREFIX.len()..]);
    Ok(out)
}

pub fn is_valid_address(address: &str) -> bool {
    decode_address(address).is_ok()
}
