use crate::util::alphabet::SENTINEL;

/// 根据后缀数组构建 BWT。
/// `BWT[i]` 为后缀 `SA[i]` 的循环前驱字符。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    sa.iter()
        .map(|&p| match p as usize {
            0 => text[n - 1],
            i => text[i - 1],
        })
        .collect()
}

/// BWT 逆变换（LF 映射），恢复带哨兵的编码文本。
///
/// 第 0 行一定是哨兵后缀，从它出发每次 LF 回退一个字符。
pub fn invert_bwt(bwt: &[u8]) -> Vec<u8> {
    let n = bwt.len();
    if n == 0 {
        return Vec::new();
    }

    // rank_before[i]：bwt[..i] 中与 bwt[i] 相同字符的个数
    let mut counts = [0usize; 256];
    let mut rank_before = Vec::with_capacity(n);
    for &ch in bwt {
        rank_before.push(counts[ch as usize]);
        counts[ch as usize] += 1;
    }
    let mut first = [0usize; 256];
    let mut acc = 0usize;
    for (f, &cnt) in first.iter_mut().zip(counts.iter()) {
        *f = acc;
        acc += cnt;
    }

    let mut text = vec![SENTINEL; n];
    let mut row = 0usize;
    for i in (0..n - 1).rev() {
        let ch = bwt[row];
        text[i] = ch;
        row = first[ch as usize] + rank_before[row];
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sa::build_sa;

    #[test]
    fn bwt_banana() {
        // banana$ -> annb$aa
        let text = [2u8, 1, 3, 1, 3, 1, 0];
        let sa = build_sa(&text);
        assert_eq!(build_bwt(&text, &sa), vec![1, 3, 3, 2, 0, 1, 1]);
    }

    #[test]
    fn bwt_is_permutation_of_text() {
        let text = [3u8, 1, 2, 2, 1, 3, 3, 1, 0];
        let sa = build_sa(&text);
        let mut a = build_bwt(&text, &sa);
        let mut b = text.to_vec();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn inverse_round_trip() {
        let mut x: u32 = 7;
        for len in 0..60 {
            let mut text: Vec<u8> = (0..len)
                .map(|_| {
                    x = x.wrapping_mul(1_103_515_245).wrapping_add(12_345);
                    ((x >> 16) % 4) as u8 + 1
                })
                .collect();
            text.push(SENTINEL);
            let sa = build_sa(&text);
            let bwt = build_bwt(&text, &sa);
            assert_eq!(invert_bwt(&bwt), text, "len={}", len);
        }
    }

    #[test]
    fn sentinel_only_round_trip() {
        let text = [SENTINEL];
        let sa = build_sa(&text);
        let bwt = build_bwt(&text, &sa);
        assert_eq!(bwt, vec![SENTINEL]);
        assert_eq!(invert_bwt(&bwt), vec![SENTINEL]);
    }
}
