//! 参考序列、查询模式与真值位置的读取。
//!
//! - 参考：纯文本（取第一行）或只含一条记录的 FASTA
//! - 模式：纯文本（每行一条）或 FASTQ
//! - 真值：空白分隔的整数，第 i 个对应第 i 条模式

pub mod fasta;
pub mod fastq;

use anyhow::{anyhow, bail, Result};
use std::io::BufRead;

use fasta::FastaReader;
use fastq::FastqReader;

pub fn open(path: &str) -> Result<std::io::BufReader<std::fs::File>> {
    let fh = std::fs::File::open(path).map_err(|e| anyhow!("cannot open '{}': {}", path, e))?;
    Ok(std::io::BufReader::new(fh))
}

/// 查看第一个非空白字节，用于判断文件格式
fn peek_first_byte<R: BufRead>(reader: &mut R) -> Result<Option<u8>> {
    loop {
        let buf = reader.fill_buf()?;
        if buf.is_empty() {
            return Ok(None);
        }
        match buf.iter().position(|b| !b.is_ascii_whitespace()) {
            Some(i) => return Ok(Some(buf[i])),
            None => {
                let n = buf.len();
                reader.consume(n);
            }
        }
    }
}

/// 读取参考序列。多条 FASTA 记录不支持拼接，直接报错。
pub fn read_reference<R: BufRead>(mut reader: R) -> Result<Vec<u8>> {
    if peek_first_byte(&mut reader)? == Some(b'>') {
        let mut fa = FastaReader::new(reader);
        let rec = fa.next_record()?.ok_or_else(|| anyhow!("FASTA input contains no sequences"))?;
        if fa.next_record()?.is_some() {
            bail!("FASTA input contains more than one sequence; only a single reference is supported");
        }
        log::debug!("reference record '{}', {} bp", rec.id, rec.seq.len());
        return Ok(rec.seq);
    }

    let mut line = String::new();
    reader.read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).as_bytes().to_vec())
}

/// 读取查询模式，保持文件中的顺序
pub fn read_patterns<R: BufRead>(mut reader: R) -> Result<Vec<Vec<u8>>> {
    if peek_first_byte(&mut reader)? == Some(b'@') {
        let mut fq = FastqReader::new(reader);
        let mut out = Vec::new();
        while let Some(rec) = fq.next_record()? {
            out.push(rec.seq);
        }
        return Ok(out);
    }

    let mut out = Vec::new();
    for line in reader.lines() {
        let line = line?;
        out.push(line.trim_end_matches('\r').as_bytes().to_vec());
    }
    Ok(out)
}

pub fn read_ground_truth<R: BufRead>(reader: R) -> Result<Vec<u32>> {
    let mut out = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        for tok in line.split_whitespace() {
            let v: u32 = tok
                .parse()
                .map_err(|e| anyhow!("ground truth line {}: invalid position '{}': {}", lineno + 1, tok, e))?;
            out.push(v);
        }
    }
    Ok(out)
}
