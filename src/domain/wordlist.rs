//! BIP39 英文词表
//!
//! 词表来自 `bip39` crate，反向索引在首次访问时构建一次

use std::collections::HashMap;

use bip39::Language;
use once_cell::sync::Lazy;

/// 词表长度（2^11）
pub const WORD_COUNT: usize = 2048;

static WORD_INDEX: Lazy<HashMap<&'static str, u16>> = Lazy::new(|| {
    word_list()
        .iter()
        .enumerate()
        .map(|(i, w)| (*w, i as u16))
        .collect()
});

/// 完整的 2048 词英文词表
pub fn word_list() -> &'static [&'static str; WORD_COUNT] {
    Language::English.word_list()
}

/// 单词 → 索引
pub fn index_of(word: &str) -> Option<u16> {
    WORD_INDEX.get(word).copied()
}

/// 索引 → 单词
pub fn word_at(index: u16) -> Option<&'static str> {
    word_list().get(index as usize).copied()
}

pub fn contains(word: &str) -> bool {
    WORD_INDEX.contains_key(word)
}
