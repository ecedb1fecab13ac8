//! 库内统一错误类型。

use thiserror::Error;

/// FM 索引构建与查询过程中的错误。
///
/// 查询无结果、模式中出现参考里不存在的字符都不是错误：
/// 前者返回空结果，后者只是剪掉对应分支。
#[derive(Debug, Error)]
pub enum FmError {
    /// 空模式没有可匹配的内容
    #[error("pattern must be non-empty")]
    EmptyPattern,

    /// 允许的错配数不能为负
    #[error("mismatch budget must be non-negative, got {0}")]
    NegativeBudget(i64),

    /// 参考序列中的不同字符过多（编码 0 预留给哨兵）
    #[error("reference uses {0} distinct symbols, at most 255 are supported")]
    AlphabetTooLarge(usize),

    /// 参考序列过长，SA 条目无法用 u32 表示
    #[error("reference length {0} exceeds the supported maximum")]
    ReferenceTooLong(usize),

    /// 单次查询展开的搜索节点数超过上限
    #[error("search expanded more than {limit} nodes")]
    NodeLimitExceeded { limit: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("index serialization error: {0}")]
    Serialize(#[from] bincode::Error),

    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, FmError>;
