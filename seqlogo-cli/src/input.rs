//! Alignment readers
//!
//! Aligned FASTA/FASTQ is parsed with needletail; plain input holds one
//! sequence per line, with blank lines and `#` comments skipped. `-` reads
//! standard input.

use std::io::{Cursor, Read};
use std::path::Path;

use clap::ValueEnum;
use needletail::parse_fastx_reader;

use crate::error::{CliError, CliResult};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// FASTA/FASTQ when the first record starts with `>` or `@`, plain otherwise
    #[default]
    Auto,
    Fasta,
    Plain,
}

/// The rows of one alignment and where they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct Sequences {
    pub source: String,
    pub ids: Vec<String>,
    pub rows: Vec<Vec<u8>>,
}

/// Read `path` (or standard input for `-`) as `format`.
pub fn read_input(path: &Path, format: InputFormat) -> CliResult<Sequences> {
    let source = path.display().to_string();
    let bytes = if source == "-" {
        let mut buf = Vec::new();
        std::io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        if !path.exists() {
            return Err(CliError::file_not_found(path.to_path_buf()));
        }
        std::fs::read(path)?
    };
    parse_sequences(&bytes, format, source)
}

/// Parse an in-memory alignment.
pub fn parse_sequences(bytes: &[u8], format: InputFormat, source: String) -> CliResult<Sequences> {
    let format = match format {
        InputFormat::Auto => detect(bytes),
        f => f,
    };
    log::debug!("reading {} as {:?}", source, format);
    let sequences = match format {
        InputFormat::Fasta => parse_fastx(bytes, source)?,
        _ => parse_plain(bytes, source)?,
    };
    log::info!(
        "read {} sequences from {}",
        sequences.rows.len(),
        sequences.source
    );
    Ok(sequences)
}

fn detect(bytes: &[u8]) -> InputFormat {
    match bytes.iter().find(|b| !b.is_ascii_whitespace()) {
        Some(b'>') | Some(b'@') => InputFormat::Fasta,
        _ => InputFormat::Plain,
    }
}

fn parse_fastx(bytes: &[u8], source: String) -> CliResult<Sequences> {
    let mut reader = parse_fastx_reader(Cursor::new(bytes))
        .map_err(|e| CliError::parse(source.as_str(), e.to_string()))?;

    let mut ids = Vec::new();
    let mut rows = Vec::new();
    while let Some(record) = reader.next() {
        let record = record.map_err(|e| CliError::parse(source.as_str(), e.to_string()))?;
        ids.push(String::from_utf8_lossy(record.id()).into_owned());
        rows.push(record.seq().to_vec());
    }

    Ok(Sequences { source, ids, rows })
}

fn parse_plain(bytes: &[u8], source: String) -> CliResult<Sequences> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| CliError::parse(source.as_str(), format!("not UTF-8 text: {}", e)))?;

    let rows: Vec<Vec<u8>> = text
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| line.as_bytes().to_vec())
        .collect();
    let ids = (1..=rows.len()).map(|i| format!("seq{}", i)).collect();

    Ok(Sequences { source, ids, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_fasta_multiline_records() {
        let fasta = b">a\nTATA\nAT\n>b\nTACAAT\n>c\nGATA-T\n";
        let seqs = parse_sequences(fasta, InputFormat::Auto, "mem".into()).unwrap();
        assert_eq!(seqs.ids, vec!["a", "b", "c"]);
        assert_eq!(seqs.rows[0], b"TATAAT".to_vec());
        assert_eq!(seqs.rows[2], b"GATA-T".to_vec());
    }

    #[test]
    fn test_plain_skips_comments_and_blanks() {
        let plain = b"# three sites\nACGT\n\n  ACGA  \nAC-T\n";
        let seqs = parse_sequences(plain, InputFormat::Auto, "mem".into()).unwrap();
        assert_eq!(
            seqs.rows,
            vec![b"ACGT".to_vec(), b"ACGA".to_vec(), b"AC-T".to_vec()]
        );
        assert_eq!(seqs.ids, vec!["seq1", "seq2", "seq3"]);
    }

    #[test]
    fn test_explicit_plain_keeps_header_like_lines() {
        let seqs = parse_sequences(b">x\nAC\n", InputFormat::Plain, "mem".into()).unwrap();
        assert_eq!(seqs.rows.len(), 2);
    }

    #[test]
    fn test_read_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, ">s1\nACGT\n>s2\nACGA").unwrap();
        let seqs = read_input(file.path(), InputFormat::Fasta).unwrap();
        assert_eq!(seqs.rows.len(), 2);
        assert_eq!(seqs.source, file.path().display().to_string());
    }

    #[test]
    fn test_missing_file() {
        let err = read_input(Path::new("/no/such/alignment.fa"), InputFormat::Auto).unwrap_err();
        assert!(matches!(err, CliError::FileNotFound { .. }));
    }
}
