use rayon::slice::ParallelSliceMut;

/// 超过该长度时后缀排序改用 rayon 并行排序
const PAR_SORT_MIN_LEN: usize = 1 << 16;

/// 构建后缀数组（前缀倍增法，每轮一次比较排序）。
///
/// 输入为编码后的文本，末尾是唯一的哨兵 0。
/// 每轮按 `(rank[i], rank[i + k])` 排序，越界的后半部分视为 -1（最小）。
/// 倍增一直进行到 `k >= n`，即使名次提前全部确定也不提前退出。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<i64> = text.iter().map(|&b| i64::from(b)).collect();
    let mut next: Vec<i64> = vec![0; n];

    let mut k = 1usize;
    while k < n {
        let key = |i: u32| {
            let i = i as usize;
            let second = if i + k < n { rank[i + k] } else { -1 };
            (rank[i], second)
        };

        if n >= PAR_SORT_MIN_LEN {
            sa.par_sort_unstable_by_key(|&i| key(i));
        } else {
            sa.sort_unstable_by_key(|&i| key(i));
        }

        // 与前一个后缀的键相同则同名次，否则名次加一
        next[sa[0] as usize] = 0;
        for w in 1..n {
            let (prev, cur) = (sa[w - 1], sa[w]);
            next[cur as usize] = next[prev as usize] + i64::from(key(prev) != key(cur));
        }

        std::mem::swap(&mut rank, &mut next);
        k <<= 1;
    }

    sa
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive_sa(text: &[u8]) -> Vec<u32> {
        let n = text.len();
        let mut suffixes: Vec<(usize, &[u8])> = (0..n).map(|i| (i, &text[i..])).collect();
        suffixes.sort_by(|a, b| a.1.cmp(b.1));
        suffixes.into_iter().map(|(i, _)| i as u32).collect()
    }

    /// 随机文本，字符取 1..=sigma，末尾加哨兵
    fn make_text(len: usize, sigma: u32, seed: u32) -> Vec<u8> {
        let mut x = seed;
        let mut v = Vec::with_capacity(len + 1);
        for _ in 0..len {
            x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            v.push(((x >> 16) % sigma) as u8 + 1);
        }
        v.push(0);
        v
    }

    #[test]
    fn sa_banana() {
        // banana$ -> b=2 a=1 n=3 $=0
        let text = [2u8, 1, 3, 1, 3, 1, 0];
        assert_eq!(build_sa(&text), vec![6, 5, 3, 1, 0, 4, 2]);
    }

    #[test]
    fn sa_sentinel_only() {
        assert_eq!(build_sa(&[0]), vec![0]);
        assert!(build_sa(&[]).is_empty());
    }

    #[test]
    fn sa_matches_naive_on_small_random_texts() {
        for len in 0..=40 {
            for sigma in [1u32, 2, 4, 7] {
                let text = make_text(len, sigma, 1_234_567 + len as u32);
                assert_eq!(build_sa(&text), naive_sa(&text), "len={} sigma={}", len, sigma);
            }
        }
    }

    #[test]
    fn sa_is_sorted_permutation() {
        let text = make_text(500, 4, 42);
        let sa = build_sa(&text);
        let mut seen = vec![false; text.len()];
        for &p in &sa {
            assert!(!seen[p as usize]);
            seen[p as usize] = true;
        }
        for w in sa.windows(2) {
            assert!(text[w[0] as usize..] < text[w[1] as usize..]);
        }
    }

    #[test]
    fn sa_highly_repetitive_text() {
        let mut text = vec![1u8; 64];
        text.push(0);
        let sa = build_sa(&text);
        let expected: Vec<u32> = (0..=64u32).rev().collect();
        assert_eq!(sa, expected);
    }
}
