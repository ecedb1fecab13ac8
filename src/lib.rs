//! # fm-approx
//!
//! 基于 FM 索引的近似子串查询：对一条固定参考序列建索引，之后反复查询
//! 允许至多 k 个替换（不含插入/删除）的模式出现位置。
//!
//! 本 crate 包括：
//!
//! - **索引构建**：前缀倍增后缀数组 → BWT → C 表与采样 Occ
//! - **精确查询**：反向搜索（LF 映射）
//! - **近似查询**：带剪枝的显式栈分支搜索，支持批量并行
//! - **周边工具**：参考/模式/真值读取，准确率报告
//!
//! ## 快速示例
//!
//! ```rust
//! use fm_approx::index::fm::{FMIndex, IndexConfig};
//!
//! let fm = FMIndex::build(b"banana", IndexConfig::default()).unwrap();
//! assert_eq!(fm.search(b"ana", 0).unwrap(), vec![1, 3]);
//! assert!(fm.search(b"ann", 1).unwrap().contains(&1));
//! ```
//!
//! ## 模块说明
//!
//! - [`index`] — 后缀数组、BWT、秩结构与 FM 索引
//! - [`search`] — 允许错配的反向搜索与批量查询
//! - [`io`] — 参考序列 / 模式 / 真值文件解析
//! - [`report`] — 查询结果与准确率输出
//! - [`util`] — 字母表编码

pub mod error;
pub mod index;
pub mod io;
pub mod report;
pub mod search;
pub mod util;

pub use error::{FmError, Result};
pub use index::fm::{FMIndex, IndexConfig, SubstitutionAlphabet};
pub use search::{Hit, HitFilter, SearchParams};
