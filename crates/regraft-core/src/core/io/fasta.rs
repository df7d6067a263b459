use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Line width used when wrapping sequences on output.
const WRAP_WIDTH: usize = 80;

#[derive(Debug, Error)]
pub enum FastaError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Sequence data on line {line} appears before any '>' header")]
    SequenceBeforeHeader { line: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FastaRecord {
    pub id: String,
    pub sequence: String,
}

impl FastaRecord {
    pub fn new(id: impl Into<String>, sequence: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            sequence: sequence.into(),
        }
    }
}

pub fn read_records(reader: &mut impl BufRead) -> Result<Vec<FastaRecord>, FastaError> {
    let mut records: Vec<FastaRecord> = Vec::new();

    for (line_num, line_res) in reader.lines().enumerate() {
        let line = line_res?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            records.push(FastaRecord::new(header.trim(), String::new()));
        } else {
            let Some(current) = records.last_mut() else {
                return Err(FastaError::SequenceBeforeHeader { line: line_num + 1 });
            };
            current.sequence.push_str(line);
        }
    }

    Ok(records)
}

pub fn write_records(records: &[FastaRecord], writer: &mut impl Write) -> Result<(), FastaError> {
    for record in records {
        writeln!(writer, ">{}", record.id)?;
        let bytes = record.sequence.as_bytes();
        for chunk in bytes.chunks(WRAP_WIDTH) {
            writer.write_all(chunk)?;
            writer.write_all(b"\n")?;
        }
    }
    Ok(())
}

pub fn read_path<P: AsRef<Path>>(path: P) -> Result<Vec<FastaRecord>, FastaError> {
    let file = File::open(path)?;
    read_records(&mut BufReader::new(file))
}

pub fn write_path<P: AsRef<Path>>(records: &[FastaRecord], path: P) -> Result<(), FastaError> {
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_records(records, &mut writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_multiple_records_joining_wrapped_lines() {
        let text = ">A\nGGGG\nAAAA\n>B\nSSSS\n";
        let records = read_records(&mut text.as_bytes()).unwrap();
        assert_eq!(
            records,
            vec![
                FastaRecord::new("A", "GGGGAAAA"),
                FastaRecord::new("B", "SSSS"),
            ]
        );
    }

    #[test]
    fn skips_blank_lines_and_trims_headers() {
        let text = "\n> win_pos110_range85-135 \n\nGGG\n";
        let records = read_records(&mut text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "win_pos110_range85-135");
        assert_eq!(records[0].sequence, "GGG");
    }

    #[test]
    fn sequence_before_header_is_an_error() {
        let text = "GGGG\n>A\n";
        let err = read_records(&mut text.as_bytes()).unwrap_err();
        assert!(matches!(err, FastaError::SequenceBeforeHeader { line: 1 }));
    }

    #[test]
    fn writes_wrap_long_sequences() {
        let records = vec![FastaRecord::new("long", "G".repeat(200))];
        let mut buffer = Vec::new();
        write_records(&records, &mut buffer).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ">long");
        assert_eq!(lines[1].len(), 80);
        assert_eq!(lines[2].len(), 80);
        assert_eq!(lines[3].len(), 40);
    }

    #[test]
    fn write_read_round_trips() {
        let records = vec![
            FastaRecord::new("A", "GAVLIPFWM"),
            FastaRecord::new("B", "STCYNQ"),
        ];
        let mut buffer = Vec::new();
        write_records(&records, &mut buffer).unwrap();
        let reread = read_records(&mut buffer.as_slice()).unwrap();
        assert_eq!(reread, records);
    }
}
