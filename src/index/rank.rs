use serde::{Deserialize, Serialize};

/// BWT 上的秩结构：C 表 + 定长分块的 Occ 采样。
///
/// - 字母以 `[0..sigma)` 编码，0 为哨兵。
/// - 每 `interval` 个位置存一份各字母的累计计数，查询时从所在块起点顺扫补偿。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankIndex {
    sigma: usize,
    interval: usize,
    /// C[c] = BWT 中编码 < c 的字母数量，末项为 BWT 长度
    c: Vec<u32>,
    bwt: Vec<u8>,
    /// 按块存储、行优先展平：checkpoints[block * sigma + c] = BWT[0..block*interval) 中 c 的数量
    checkpoints: Vec<u32>,
}

impl RankIndex {
    pub fn build(bwt: Vec<u8>, sigma: usize, interval: usize) -> Self {
        let interval = interval.max(1);
        let n = bwt.len();

        let mut freq = vec![0u32; sigma];
        for &ch in &bwt {
            if let Some(f) = freq.get_mut(ch as usize) {
                *f += 1;
            }
        }
        let mut c = Vec::with_capacity(sigma + 1);
        let mut acc = 0u32;
        for &f in &freq {
            c.push(acc);
            acc += f;
        }
        c.push(acc);

        let num_blocks = (n + interval - 1) / interval;
        let mut checkpoints = Vec::with_capacity(num_blocks * sigma);
        let mut running = vec![0u32; sigma];
        for block in bwt.chunks(interval) {
            checkpoints.extend_from_slice(&running);
            for &ch in block {
                if let Some(r) = running.get_mut(ch as usize) {
                    *r += 1;
                }
            }
        }

        Self { sigma, interval, c, bwt, checkpoints }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bwt.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bwt.is_empty()
    }

    pub fn sigma(&self) -> usize {
        self.sigma
    }

    pub fn interval(&self) -> usize {
        self.interval
    }

    pub fn bwt(&self) -> &[u8] {
        &self.bwt
    }

    /// 字母 c 在排序后第一列中的起始名次（C 表）
    #[inline]
    pub fn first_occurrence(&self, c: u8) -> Option<usize> {
        let ci = c as usize;
        if ci >= self.sigma {
            return None;
        }
        Some(self.c[ci] as usize)
    }

    /// 字母 c 在整个 BWT 中的出现次数
    pub fn count(&self, c: u8) -> usize {
        let ci = c as usize;
        if ci >= self.sigma {
            return 0;
        }
        (self.c[ci + 1] - self.c[ci]) as usize
    }

    /// BWT[0..pos) 中 c 的出现次数
    #[inline]
    pub fn rank(&self, c: u8, pos: usize) -> usize {
        let ci = c as usize;
        if pos == 0 || ci >= self.sigma {
            return 0;
        }
        let pos = pos.min(self.bwt.len());
        let block = (pos - 1) / self.interval;
        let base = self.checkpoints[block * self.sigma + ci] as usize;
        let start = block * self.interval;
        base + self.bwt[start..pos].iter().filter(|&&ch| ch == c).count()
    }

    /// BWT[0..=i] 中 c 的出现次数
    #[inline]
    pub fn occ(&self, c: u8, i: usize) -> usize {
        self.rank(c, i + 1)
    }

    /// 在闭区间 [top, bottom] 前扩展字符 c，返回新的闭区间；区间为空或 c 不在字母表内时返回 None。
    #[inline]
    pub fn advance(&self, c: u8, top: usize, bottom: usize) -> Option<(usize, usize)> {
        let c0 = self.first_occurrence(c)?;
        let new_top = c0 + self.rank(c, top);
        let new_bottom = (c0 + self.occ(c, bottom)).checked_sub(1)?;
        (new_top <= new_bottom).then_some((new_top, new_bottom))
    }
}
