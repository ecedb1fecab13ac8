use anyhow::{bail, Result};
use std::io::BufRead;

/// FASTQ 读段；质量值只做长度校验，不保留
#[derive(Debug, Clone)]
pub struct FastqRecord {
    pub id: String,
    pub seq: Vec<u8>,
}

/// 四行一条的 FASTQ 读取器（不支持序列折行）
pub struct FastqReader<R: BufRead> {
    reader: R,
    buf: String,
    records: usize,
}

impl<R: BufRead> FastqReader<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, buf: String::new(), records: 0 }
    }

    fn next_line(&mut self) -> Result<Option<&str>> {
        self.buf.clear();
        if self.reader.read_line(&mut self.buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(self.buf.trim_end()))
    }

    pub fn next_record(&mut self) -> Result<Option<FastqRecord>> {
        let rec_no = self.records + 1;

        let id = loop {
            match self.next_line()? {
                None => return Ok(None),
                Some("") => continue,
                Some(h) => match h.strip_prefix('@') {
                    Some(h) => break h.split_whitespace().next().unwrap_or("").to_string(),
                    None => bail!("FASTQ record {}: header does not start with '@'", rec_no),
                },
            }
        };

        let seq = match self.next_line()? {
            Some(s) => s.as_bytes().to_vec(),
            None => bail!("FASTQ record {}: unexpected EOF after header", rec_no),
        };

        match self.next_line()? {
            Some(plus) if plus.starts_with('+') => {}
            _ => bail!("FASTQ record {}: missing '+' line", rec_no),
        }

        let qual_len = match self.next_line()? {
            Some(q) => q.len(),
            None => bail!("FASTQ record {}: missing quality line", rec_no),
        };
        if qual_len != seq.len() {
            bail!("FASTQ record {}: sequence/quality length mismatch ({} vs {})", rec_no, seq.len(), qual_len);
        }

        self.records = rec_no;
        Ok(Some(FastqRecord { id, seq }))
    }
}
