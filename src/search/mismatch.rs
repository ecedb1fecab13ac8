use super::{Hit, HitFilter, SearchParams};
use crate::error::{FmError, Result};
use crate::index::fm::FMIndex;

/// 搜索栈帧：还剩 `remaining` 个模式字符未处理，当前 SA 闭区间与剩余错配预算
#[derive(Debug, Clone, Copy)]
struct Frame {
    remaining: usize,
    top: usize,
    bottom: usize,
    budget: u32,
}

/// 允许至多 k 个替换的反向搜索。
///
/// 从模式末尾向前逐字符收窄 SA 区间：先走精确分支，预算未用完时再对
/// 替换字母表中每个不同于当前字符的字母各开一个分支。所有成功的分支都会展开。
/// 用显式栈代替递归，`max_nodes` 限制单次查询展开的节点数。
///
/// 返回按位置排序、按位置去重的命中（同一位置保留错配最少的那条路径）。
pub fn search_hits(fm: &FMIndex, pattern: &[u8], params: &SearchParams) -> Result<Vec<Hit>> {
    if pattern.is_empty() {
        return Err(FmError::EmptyPattern);
    }
    let m = pattern.len();
    if m > fm.reference_len() {
        return Ok(Vec::new());
    }

    let codes = fm.alphabet().encode_pattern(pattern);
    let rank = fm.rank_index();
    let subs = fm.substitution_codes();
    let k = params.max_mismatches;

    let mut hits: Vec<Hit> = Vec::new();
    let mut stack = vec![Frame { remaining: m, top: 0, bottom: fm.len() - 1, budget: k }];
    let mut expanded = 0usize;

    while let Some(f) = stack.pop() {
        expanded += 1;
        if let Some(limit) = params.max_nodes {
            if expanded > limit {
                return Err(FmError::NodeLimitExceeded { limit });
            }
        }

        if f.remaining == 0 {
            for &pos in fm.sa_interval_positions(f.top, f.bottom) {
                if keep_hit(params.hit_filter, pos as usize, m, fm.reference_len()) {
                    hits.push(Hit { offset: pos, mismatches: k - f.budget });
                }
            }
            continue;
        }

        let next = f.remaining - 1;
        let p = codes[next];

        if f.budget > 0 {
            for &c in subs {
                if Some(c) == p {
                    continue;
                }
                if let Some((top, bottom)) = rank.advance(c, f.top, f.bottom) {
                    stack.push(Frame { remaining: next, top, bottom, budget: f.budget - 1 });
                }
            }
        }
        // 精确分支最后入栈、最先展开
        if let Some(c) = p {
            if let Some((top, bottom)) = rank.advance(c, f.top, f.bottom) {
                stack.push(Frame { remaining: next, top, bottom, budget: f.budget });
            }
        }
    }

    hits.sort_unstable_by_key(|h| (h.offset, h.mismatches));
    hits.dedup_by_key(|h| h.offset);
    log::trace!("pattern len {} k {}: {} hits, {} nodes", m, k, hits.len(), expanded);
    Ok(hits)
}

fn keep_hit(filter: HitFilter, pos: usize, m: usize, reference_len: usize) -> bool {
    match filter {
        HitFilter::PastEnd => pos + m <= reference_len,
        HitFilter::ShortOffset => pos >= m,
    }
}
