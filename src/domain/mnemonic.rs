//! 助记词引擎
//!
//! 负责从安全随机源生成 BIP39 助记词，以及校验/规范化外部输入的助记词。
//! 编码、校验位与种子拉伸交给 `bip39` crate。
//!
//! 校验有两种策略：
//! - `Lenient`：只检查单词数量和词表成员（默认）
//! - `Strict`：额外重新计算助记词末尾嵌入的校验位

use std::str::FromStr;

use bip39::{Language, Mnemonic};
use rand::{rngs::OsRng, RngCore};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::wordlist;
use crate::error::{WalletError, WalletResult};

/// 生成器支持的熵长度（bit）
pub const SUPPORTED_STRENGTHS: [u32; 2] = [128, 256];

/// 校验器接受的单词数量
pub const ACCEPTED_WORD_COUNTS: [usize; 3] = [12, 18, 24];

/// 助记词校验位策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChecksumPolicy {
    #[default]
    Lenient,
    Strict,
}

impl FromStr for ChecksumPolicy {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "lenient" => Ok(ChecksumPolicy::Lenient),
            "strict" => Ok(ChecksumPolicy::Strict),
            other => Err(WalletError::Config(format!(
                "unknown checksum policy '{}', expected 'lenient' or 'strict'",
                other
            ))),
        }
    }
}

/// 规范化结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedMnemonic {
    /// 单空格分隔的助记词
    pub phrase: String,
    /// 输入是否被改写过（首尾空白或连续空白）
    pub was_normalized: bool,
}

impl NormalizedMnemonic {
    pub fn word_count(&self) -> usize {
        self.phrase.split(' ').count()
    }
}

/// 生成新的助记词
///
/// # Arguments
/// * `strength_bits` - 熵长度，128（12 词）或 256（24 词）
pub fn generate(strength_bits: u32) -> WalletResult<String> {
    if !SUPPORTED_STRENGTHS.contains(&strength_bits) {
        return Err(WalletError::InvalidStrength {
            bits: strength_bits,
        });
    }

    let len = (strength_bits / 8) as usize;
    let mut entropy = Zeroizing::new([0u8; 32]);
    OsRng.fill_bytes(&mut entropy[..len]);

    entropy_to_mnemonic(&entropy[..len])
}

/// 由给定熵确定性地编码助记词
pub fn entropy_to_mnemonic(entropy: &[u8]) -> WalletResult<String> {
    let strength_bits = (entropy.len() * 8) as u32;
    if !SUPPORTED_STRENGTHS.contains(&strength_bits) {
        return Err(WalletError::InvalidStrength {
            bits: strength_bits,
        });
    }

    let mnemonic = Mnemonic::from_entropy_in(Language::English, entropy)
        .map_err(|e| from_bip39_error(e, ""))?;
    Ok(mnemonic.to_string())
}

/// 折叠首尾及内部连续空白为单个空格
pub fn normalize_whitespace(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 校验并规范化助记词（宽松策略）
pub fn validate_and_normalize(raw: &str) -> WalletResult<NormalizedMnemonic> {
    validate_with_policy(raw, ChecksumPolicy::Lenient)
}

/// 按指定策略校验并规范化助记词
///
/// 规范化改写了输入时输出一条非致命告警
pub fn validate_with_policy(raw: &str, policy: ChecksumPolicy) -> WalletResult<NormalizedMnemonic> {
    parse_with_policy(raw, policy).map(|(normalized, _)| normalized)
}

/// 校验并解析为 `bip39::Mnemonic`，供种子派生使用
pub(crate) fn parse_with_policy(
    raw: &str,
    policy: ChecksumPolicy,
) -> WalletResult<(NormalizedMnemonic, Mnemonic)> {
    let phrase = normalize_whitespace(raw);
    let was_normalized = phrase != raw;
    if was_normalized {
        tracing::warn!("Mnemonic whitespace normalized (trimmed or collapsed)");
    }

    let words: Vec<&str> = if phrase.is_empty() {
        Vec::new()
    } else {
        phrase.split(' ').collect()
    };

    if !ACCEPTED_WORD_COUNTS.contains(&words.len()) {
        return Err(WalletError::InvalidWordCount { found: words.len() });
    }

    // 先列出全部非法单词，bip39 只报告第一个
    let invalid: Vec<String> = words
        .iter()
        .filter(|w| !wordlist::contains(w))
        .map(|w| w.to_string())
        .collect();
    if !invalid.is_empty() {
        return Err(WalletError::InvalidWords { words: invalid });
    }

    // 词表全是 ASCII，规范化后的短语已是 NFKD 形式
    let parsed = match policy {
        ChecksumPolicy::Strict => Mnemonic::parse_in_normalized(Language::English, &phrase),
        ChecksumPolicy::Lenient => {
            Mnemonic::parse_in_normalized_without_checksum_check(Language::English, &phrase)
        }
    }
    .map_err(|e| from_bip39_error(e, &phrase))?;

    Ok((
        NormalizedMnemonic {
            phrase,
            was_normalized,
        },
        parsed,
    ))
}

fn from_bip39_error(err: bip39::Error, phrase: &str) -> WalletError {
    match err {
        bip39::Error::BadWordCount(found) => WalletError::InvalidWordCount { found },
        bip39::Error::UnknownWord(i) => WalletError::InvalidWords {
            words: phrase
                .split(' ')
                .nth(i)
                .map(|w| vec![w.to_string()])
                .unwrap_or_default(),
        },
        bip39::Error::BadEntropyBitCount(bits) => WalletError::InvalidStrength { bits: bits as u32 },
        bip39::Error::InvalidChecksum => WalletError::InvalidChecksum,
        bip39::Error::AmbiguousLanguages(_) => WalletError::InvalidWords { words: Vec::new() },
    }
}
