use std::io::Write;

use crate::error::Result;

/// 单条模式与其真值位置的比较结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternOutcome {
    pub expected: u32,
    pub found: bool,
}

/// 准确率报告：某条模式的命中集合包含真值位置即视为正确
#[derive(Debug, Clone, Default)]
pub struct EvalReport {
    pub outcomes: Vec<PatternOutcome>,
    pub correct: usize,
}

impl EvalReport {
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// 百分比；没有模式时为 0
    pub fn accuracy(&self) -> f64 {
        if self.outcomes.is_empty() {
            return 0.0;
        }
        self.correct as f64 / self.outcomes.len() as f64 * 100.0
    }

    /// 逐条输出 `Pattern i: Match at P` / `Pattern i: No match`，最后一行为准确率
    pub fn write_to<W: Write>(&self, out: &mut W) -> Result<()> {
        for (i, o) in self.outcomes.iter().enumerate() {
            if o.found {
                writeln!(out, "Pattern {}: Match at {}", i + 1, o.expected)?;
            } else {
                writeln!(out, "Pattern {}: No match", i + 1)?;
            }
        }
        writeln!(out, "Accuracy: {}%", self.accuracy())?;
        Ok(())
    }
}

/// 按下标配对命中结果与真值；`results[i]` 必须已按位置升序排列
pub fn evaluate(results: &[Vec<u32>], truth: &[u32]) -> EvalReport {
    let mut report = EvalReport::default();
    for (hits, &expected) in results.iter().zip(truth) {
        let found = hits.binary_search(&expected).is_ok();
        if found {
            report.correct += 1;
        }
        report.outcomes.push(PatternOutcome { expected, found });
    }
    report
}

/// 查询结果：每条模式一行 `序号\t命中数\t位置列表`，无命中时位置列为 `*`
pub fn write_hits<W: Write>(out: &mut W, results: &[Vec<u32>]) -> Result<()> {
    for (i, hits) in results.iter().enumerate() {
        if hits.is_empty() {
            writeln!(out, "{}\t0\t*", i + 1)?;
            continue;
        }
        let list: Vec<String> = hits.iter().map(u32::to_string).collect();
        writeln!(out, "{}\t{}\t{}", i + 1, hits.len(), list.join(","))?;
    }
    Ok(())
}
