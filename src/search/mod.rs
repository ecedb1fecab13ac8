//! 基于 FM 索引的近似匹配：允许至多 k 个替换的反向搜索与批量查询。

pub mod mismatch;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{FmError, Result};
use crate::index::fm::FMIndex;

pub use mismatch::search_hits;

/// 命中：参考上的起始位置，以及到达该位置的比对用掉的替换数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hit {
    pub offset: u32,
    pub mismatches: u32,
}

/// 终止区间内命中的后过滤规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitFilter {
    /// 只丢弃会越过参考末尾（进入哨兵）的命中
    #[default]
    PastEnd,
    /// 丢弃所有 SA 起点小于模式长度的命中（旧行为）
    ShortOffset,
}

/// 查询参数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParams {
    pub max_mismatches: u32,
    pub hit_filter: HitFilter,
    /// 单次查询最多展开的搜索节点数，None 表示不限
    pub max_nodes: Option<usize>,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self { max_mismatches: 0, hit_filter: HitFilter::PastEnd, max_nodes: None }
    }
}

impl SearchParams {
    /// 从有符号的错配数构造参数，负数视为非法输入
    pub fn with_budget(k: i64) -> Result<Self> {
        let max_mismatches = u32::try_from(k).map_err(|_| FmError::NegativeBudget(k))?;
        Ok(Self { max_mismatches, ..Self::default() })
    }
}

impl FMIndex {
    /// 允许至多 `max_mismatches` 个替换的查询，返回升序、去重的参考位置
    pub fn search(&self, pattern: &[u8], max_mismatches: u32) -> Result<Vec<u32>> {
        self.search_with(pattern, &SearchParams { max_mismatches, ..SearchParams::default() })
    }

    pub fn search_with(&self, pattern: &[u8], params: &SearchParams) -> Result<Vec<u32>> {
        Ok(search_hits(self, pattern, params)?.into_iter().map(|h| h.offset).collect())
    }

    pub fn search_hits(&self, pattern: &[u8], params: &SearchParams) -> Result<Vec<Hit>> {
        search_hits(self, pattern, params)
    }
}

/// 在 `threads` 个线程上并行查询一批模式，结果与输入顺序一一对应。
/// 索引只读共享，每个查询独立失败。
pub fn search_batch<P>(fm: &FMIndex, patterns: &[P], params: &SearchParams, threads: usize) -> Result<Vec<Result<Vec<u32>>>>
where
    P: AsRef<[u8]> + Sync,
{
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads.max(1)).build()?;
    let results: Vec<Result<Vec<u32>>> = pool.install(|| {
        patterns
            .par_iter()
            .map(|p| fm.search_with(p.as_ref(), params))
            .collect()
    });
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::fm::IndexConfig;

    #[test]
    fn budget_must_be_non_negative() {
        assert!(matches!(SearchParams::with_budget(-1), Err(FmError::NegativeBudget(-1))));
        assert_eq!(SearchParams::with_budget(2).unwrap().max_mismatches, 2);
    }

    #[test]
    fn search_convenience_returns_offsets() {
        let fm = FMIndex::build(b"banana", IndexConfig::default()).unwrap();
        assert_eq!(fm.search(b"ana", 0).unwrap(), vec![1, 3]);
        assert_eq!(fm.search(b"na", 0).unwrap(), vec![2, 4]);
    }

    #[test]
    fn batch_matches_sequential() {
        let reference = b"ACGTTGCAACGTAGGCTAACGTTTACGATCGACGTACGGT";
        let fm = FMIndex::build(reference, IndexConfig::dna()).unwrap();
        let patterns: Vec<&[u8]> = vec![&b"ACGT"[..], &b"TTTT"[..], &b""[..], &b"GGCTA"[..], &b"CGAT"[..]];
        let params = SearchParams { max_mismatches: 1, ..SearchParams::default() };

        let batch = search_batch(&fm, &patterns, &params, 3).unwrap();
        assert_eq!(batch.len(), patterns.len());
        for (p, res) in patterns.iter().zip(&batch) {
            match fm.search_with(p, &params) {
                Ok(expected) => assert_eq!(res.as_ref().unwrap(), &expected),
                Err(_) => assert!(res.is_err()),
            }
        }
        assert!(matches!(batch[2], Err(FmError::EmptyPattern)));
    }
}
