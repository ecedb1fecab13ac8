//! FM 索引构建：后缀数组 → BWT → 秩结构 → 索引。

pub mod bwt;
pub mod fm;
pub mod rank;
pub mod sa;
