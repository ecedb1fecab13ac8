use serde::{Deserialize, Serialize};

use crate::error::{FmError, Result};

/// 哨兵编码，字典序最小，且只出现在文本末尾
pub const SENTINEL: u8 = 0;

/// 除哨兵外最多可编码的字符数
pub const MAX_SYMBOLS: usize = u8::MAX as usize;

/// 核苷酸替换字母表（与常见短读段比对场景一致）
pub const DNA_SYMBOLS: &[u8] = b"ACGT";

/// 参考序列字母表：把原始字节映射为稠密编码 `1..=n`，0 预留为 `$`。
///
/// 编码顺序与字节顺序一致，因此编码后的后缀顺序与原始字节的后缀顺序相同。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alphabet {
    /// 按字节序排列的不同字符；`symbols[i]` 的编码为 `i + 1`
    symbols: Vec<u8>,
    /// 256 项查找表，0 表示该字节不在字母表内
    lookup: Vec<u8>,
}

impl Alphabet {
    /// 从参考序列中统计出现过的字符。
    pub fn from_text(text: &[u8]) -> Result<Self> {
        let mut seen = [false; 256];
        for &b in text {
            seen[b as usize] = true;
        }
        let symbols: Vec<u8> = (0..=u8::MAX).filter(|&b| seen[b as usize]).collect();
        if symbols.len() > MAX_SYMBOLS {
            return Err(FmError::AlphabetTooLarge(symbols.len()));
        }

        let mut lookup = vec![0u8; 256];
        for (i, &b) in symbols.iter().enumerate() {
            lookup[b as usize] = (i + 1) as u8;
        }
        Ok(Self { symbols, lookup })
    }

    /// 字母表大小，包含哨兵
    #[inline]
    pub fn sigma(&self) -> usize {
        self.symbols.len() + 1
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }

    #[inline]
    pub fn encode(&self, b: u8) -> Option<u8> {
        match self.lookup[b as usize] {
            0 => None,
            code => Some(code),
        }
    }

    #[inline]
    pub fn decode(&self, code: u8) -> Option<u8> {
        if code == SENTINEL {
            return None;
        }
        self.symbols.get(code as usize - 1).copied()
    }

    /// 编码参考序列并追加哨兵。
    /// 调用方需保证 `text` 就是构建本字母表所用的序列。
    pub fn encode_reference(&self, text: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(text.len() + 1);
        out.extend(text.iter().map(|&b| self.lookup[b as usize]));
        out.push(SENTINEL);
        out
    }

    /// 编码查询模式；不在字母表内的字符为 `None`。
    pub fn encode_pattern(&self, pattern: &[u8]) -> Vec<Option<u8>> {
        pattern.iter().map(|&b| self.encode(b)).collect()
    }

    /// 解码编码文本，跳过哨兵。
    pub fn decode_text(&self, codes: &[u8]) -> Vec<u8> {
        codes.iter().filter_map(|&c| self.decode(c)).collect()
    }
}
