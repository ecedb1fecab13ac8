//! 演示如何在 library 模式下使用 fm-approx 做允许错配的查询。
//!
//! 运行方式：
//! ```bash
//! cargo run --example mismatch_search
//! ```

use fm_approx::index::fm::{FMIndex, IndexConfig};
use fm_approx::search::{self, SearchParams};

fn main() -> anyhow::Result<()> {
    // 1. 构建索引
    let reference = b"ACGTACGTAGCTGATCGTAGCTAGCTAGCTGATCGTAGCTAGCTAGCTGAT";
    println!("参考序列: {}", String::from_utf8_lossy(reference));
    println!("参考长度: {} bp", reference.len());

    let fm = FMIndex::build(reference, IndexConfig::dna())?;
    println!("FM 索引构建完成：BWT 长度={}, 替换字母表={}", fm.bwt().len(), String::from_utf8_lossy(&fm.substitution_symbols()));

    // 2. 精确匹配
    let pattern = b"GCTGATCG";
    println!("\n精确匹配 '{}': {:?}", String::from_utf8_lossy(pattern), fm.search(pattern, 0)?);

    // 3. 允许错配
    let read = b"GCTGTTCG"; // 第 5 位错配
    for k in 0..=2 {
        let params = SearchParams { max_mismatches: k, ..SearchParams::default() };
        let hits = fm.search_hits(read, &params)?;
        println!("k={} '{}':", k, String::from_utf8_lossy(read));
        for h in &hits {
            println!("  offset={} mismatches={}", h.offset, h.mismatches);
        }
    }

    // 4. 批量查询
    let reads: Vec<&[u8]> = vec![&b"TAGCTAGC"[..], &b"GATCGTAG"[..], &b"TTTTTTTT"[..]];
    let params = SearchParams { max_mismatches: 1, ..SearchParams::default() };
    let results = search::search_batch(&fm, &reads, &params, 2)?;
    println!("\n批量查询:");
    for (r, res) in reads.iter().zip(results) {
        println!("  {} -> {:?}", String::from_utf8_lossy(r), res?);
    }

    println!("\n完成！");
    Ok(())
}
