use serde::{Deserialize, Serialize};

use super::{bwt, rank::RankIndex, sa};
use crate::error::{FmError, Result};
use crate::util::alphabet::{Alphabet, DNA_SYMBOLS, SENTINEL};

/// 默认 Occ 采样间隔
pub const DEFAULT_OCC_INTERVAL: usize = 64;

/// 错配分支允许替换成的字符集合
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubstitutionAlphabet {
    /// 参考序列中出现过的所有字符（不含哨兵）
    Observed,
    /// 调用方指定的字符；参考中不存在的字符在构建时丢弃
    Explicit(Vec<u8>),
}

/// 索引构建参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexConfig {
    pub occ_interval: usize,
    pub substitutions: SubstitutionAlphabet,
}

impl Default for IndexConfig {
    fn default() -> Self {
        Self { occ_interval: DEFAULT_OCC_INTERVAL, substitutions: SubstitutionAlphabet::Observed }
    }
}

impl IndexConfig {
    /// 只在 A/C/G/T 之间做替换
    pub fn dna() -> Self {
        Self { substitutions: SubstitutionAlphabet::Explicit(DNA_SYMBOLS.to_vec()), ..Self::default() }
    }
}

/// 索引元信息（构建来源、参数与时间戳），仅用于记录
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMeta {
    pub reference_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// 单条参考序列上的 FM 索引。
///
/// 构建后不可变：SA、BWT、C 表与 Occ 采样都由本结构独占，查询只读，
/// 因此 `&FMIndex` 可以在多个线程间直接共享。
/// 保存完整 SA，区间到位置的换算是一次数组访问。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FMIndex {
    alphabet: Alphabet,
    sa: Vec<u32>,
    rank: RankIndex,
    /// 替换分支使用的字符编码，升序、不含哨兵
    substitutions: Vec<u8>,
    config: IndexConfig,
    meta: IndexMeta,
}

impl FMIndex {
    /// 对参考序列构建索引。空序列得到只含哨兵的索引。
    pub fn build(reference: &[u8], config: IndexConfig) -> Result<Self> {
        if reference.len() >= u32::MAX as usize {
            return Err(FmError::ReferenceTooLong(reference.len()));
        }
        let alphabet = Alphabet::from_text(reference)?;
        let text = alphabet.encode_reference(reference);
        log::debug!("alphabet: {} symbols (+ sentinel), text length {}", alphabet.symbols().len(), text.len());

        let sa_arr = sa::build_sa(&text);
        log::debug!("suffix array built: {} entries", sa_arr.len());
        let bwt_arr = bwt::build_bwt(&text, &sa_arr);
        let rank = RankIndex::build(bwt_arr, alphabet.sigma(), config.occ_interval);
        log::debug!("rank index built: occ interval {}", rank.interval());

        let substitutions = resolve_substitutions(&alphabet, &config.substitutions);
        Ok(Self { alphabet, sa: sa_arr, rank, substitutions, config, meta: IndexMeta::default() })
    }

    /// 文本长度（含哨兵）
    #[inline]
    pub fn len(&self) -> usize {
        self.sa.len()
    }

    /// 永远为 false：即使参考为空也有哨兵
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.sa.is_empty()
    }

    /// 原始参考序列长度（不含哨兵）
    #[inline]
    pub fn reference_len(&self) -> usize {
        self.sa.len().saturating_sub(1)
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn sa(&self) -> &[u32] {
        &self.sa
    }

    pub fn bwt(&self) -> &[u8] {
        self.rank.bwt()
    }

    pub fn rank_index(&self) -> &RankIndex {
        &self.rank
    }

    pub fn config(&self) -> &IndexConfig {
        &self.config
    }

    pub fn meta(&self) -> &IndexMeta {
        &self.meta
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    /// 替换分支使用的字符编码
    pub fn substitution_codes(&self) -> &[u8] {
        &self.substitutions
    }

    /// 替换分支使用的原始字符
    pub fn substitution_symbols(&self) -> Vec<u8> {
        self.substitutions.iter().filter_map(|&c| self.alphabet.decode(c)).collect()
    }

    /// 精确反向搜索，返回闭区间 [top, bottom]；无匹配时返回 None。
    /// 空模式返回整个 SA 区间。
    pub fn backward_search(&self, pattern: &[u8]) -> Option<(usize, usize)> {
        let mut top = 0usize;
        let mut bottom = self.len() - 1;
        for &b in pattern.iter().rev() {
            let code = self.alphabet.encode(b)?;
            (top, bottom) = self.rank.advance(code, top, bottom)?;
        }
        Some((top, bottom))
    }

    /// 模式在参考中的精确出现次数
    pub fn count(&self, pattern: &[u8]) -> usize {
        if pattern.is_empty() {
            return 0;
        }
        self.backward_search(pattern).map_or(0, |(top, bottom)| bottom - top + 1)
    }

    /// 取出闭区间 [top, bottom] 对应的文本位置
    pub fn sa_interval_positions(&self, top: usize, bottom: usize) -> &[u32] {
        &self.sa[top..=bottom]
    }

    /// 由 BWT 逆变换恢复参考序列（不含哨兵）
    pub fn reconstruct_reference(&self) -> Vec<u8> {
        self.alphabet.decode_text(&bwt::invert_bwt(self.rank.bwt()))
    }

    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let f = std::fs::File::create(path)?;
        let mut w = std::io::BufWriter::new(f);
        bincode::serialize_into(&mut w, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> Result<Self> {
        let f = std::fs::File::open(path)?;
        let idx: Self = bincode::deserialize_from(std::io::BufReader::new(f))?;
        Ok(idx)
    }
}

fn resolve_substitutions(alphabet: &Alphabet, subs: &SubstitutionAlphabet) -> Vec<u8> {
    match subs {
        SubstitutionAlphabet::Observed => (1..alphabet.sigma()).map(|c| c as u8).collect(),
        SubstitutionAlphabet::Explicit(symbols) => {
            let mut codes = Vec::with_capacity(symbols.len());
            for &b in symbols {
                match alphabet.encode(b) {
                    Some(code) => codes.push(code),
                    None => log::warn!("substitution symbol {:?} does not occur in the reference, dropped", b as char),
                }
            }
            codes.sort_unstable();
            codes.dedup();
            debug_assert!(!codes.contains(&SENTINEL));
            codes
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_positions(text: &[u8], pat: &[u8]) -> Vec<u32> {
        if pat.is_empty() || pat.len() > text.len() {
            return Vec::new();
        }
        (0..=text.len() - pat.len())
            .filter(|&i| &text[i..i + pat.len()] == pat)
            .map(|i| i as u32)
            .collect()
    }

    #[test]
    fn banana_exact() {
        let fm = FMIndex::build(b"banana", IndexConfig::default()).unwrap();
        assert_eq!(fm.len(), 7);
        assert_eq!(fm.reference_len(), 6);
        let (top, bottom) = fm.backward_search(b"ana").unwrap();
        let mut pos = fm.sa_interval_positions(top, bottom).to_vec();
        pos.sort_unstable();
        assert_eq!(pos, vec![1, 3]);
        assert_eq!(fm.count(b"ana"), 2);
        assert_eq!(fm.count(b"nab"), 0);
        assert!(fm.backward_search(b"xyz").is_none());
    }

    #[test]
    fn backward_search_matches_naive() {
        let reference = b"ACGTTGCAACGTAGGCTAACGTTTACGATCGACGT";
        let fm = FMIndex::build(reference, IndexConfig { occ_interval: 5, ..IndexConfig::default() }).unwrap();
        for len in 1..=6 {
            for start in 0..=reference.len() - len {
                let pat = &reference[start..start + len];
                let (top, bottom) = fm.backward_search(pat).unwrap();
                let mut got = fm.sa_interval_positions(top, bottom).to_vec();
                got.sort_unstable();
                assert_eq!(got, naive_positions(reference, pat));
            }
        }
    }

    #[test]
    fn empty_reference_is_sentinel_only() {
        let fm = FMIndex::build(b"", IndexConfig::default()).unwrap();
        assert_eq!(fm.len(), 1);
        assert_eq!(fm.reference_len(), 0);
        assert_eq!(fm.sa(), &[0u32][..]);
        assert_eq!(fm.bwt(), &[SENTINEL]);
        assert!(fm.substitution_codes().is_empty());
        assert_eq!(fm.count(b"A"), 0);
    }

    #[test]
    fn reconstruct_round_trip() {
        for reference in [&b"banana"[..], b"", b"A", b"mississippi", b"ACGTNNACGT"] {
            let fm = FMIndex::build(reference, IndexConfig::default()).unwrap();
            assert_eq!(fm.reconstruct_reference(), reference);
        }
    }

    #[test]
    fn substitution_alphabet_observed_and_explicit() {
        let fm = FMIndex::build(b"ACGTN", IndexConfig::default()).unwrap();
        assert_eq!(fm.substitution_symbols(), b"ACGNT");

        let fm = FMIndex::build(b"ACGTN", IndexConfig::dna()).unwrap();
        assert_eq!(fm.substitution_symbols(), b"ACGT");

        // 参考中没有 T：显式给出的 T 被丢弃
        let fm = FMIndex::build(b"AACCGG", IndexConfig::dna()).unwrap();
        assert_eq!(fm.substitution_symbols(), b"ACG");
    }

    #[test]
    fn save_and_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ref.fm");
        let path = path.to_str().unwrap();

        let mut fm = FMIndex::build(b"GATTACAGATTACA", IndexConfig::dna()).unwrap();
        fm.set_meta(IndexMeta { reference_file: Some("ref.txt".into()), ..IndexMeta::default() });
        fm.save_to_file(path).unwrap();

        let loaded = FMIndex::load_from_file(path).unwrap();
        assert_eq!(loaded.sa(), fm.sa());
        assert_eq!(loaded.bwt(), fm.bwt());
        assert_eq!(loaded.config(), fm.config());
        assert_eq!(loaded.meta().reference_file.as_deref(), Some("ref.txt"));
        assert_eq!(loaded.count(b"TACA"), 2);
    }
}
