use std::io::{self, Write};

use crate::merge::FinalResult;

/// Output layout for the per-key report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One aligned line per key, with its observation count.
    #[default]
    Table,
    /// `{key=min/mean/max, ...}` on a single line.
    Compact,
}

/// One reported key, values in tenths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub key: String,
    pub min: i64,
    pub mean: i64,
    pub max: i64,
    pub count: u64,
}

/// Rows for every key in `result`, ordered by raw key bytes.
pub fn rows(result: &FinalResult) -> Vec<Row> {
    result
        .sorted()
        .into_iter()
        .filter_map(|(key, stats)| {
            Some(Row {
                key: String::from_utf8_lossy(key).into_owned(),
                min: stats.min,
                mean: stats.mean_tenths()?,
                max: stats.max,
                count: stats.count,
            })
        })
        .collect()
}

/// Formats a tenths value as a one-decimal number, e.g. `-5` as `-0.5`.
pub fn tenths(v: i64) -> String {
    let sign = if v < 0 { "-" } else { "" };
    let abs = v.unsigned_abs();
    format!("{sign}{}.{}", abs / 10, abs % 10)
}

pub fn write_report<W: Write>(out: &mut W, result: &FinalResult, format: Format) -> io::Result<()> {
    let rows = rows(result);
    match format {
        Format::Table => {
            for r in &rows {
                writeln!(
                    out,
                    "{:>25} min {:>5} avg {:>5} max {:>5} cnt {:>10}",
                    r.key,
                    tenths(r.min),
                    tenths(r.mean),
                    tenths(r.max),
                    r.count
                )?;
            }
        }
        Format::Compact => {
            write!(out, "{{")?;
            for (i, r) in rows.iter().enumerate() {
                if i > 0 {
                    write!(out, ", ")?;
                }
                write!(
                    out,
                    "{}={}/{}/{}",
                    r.key,
                    tenths(r.min),
                    tenths(r.mean),
                    tenths(r.max)
                )?;
            }
            writeln!(out, "}}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::PartitionTable;

    fn result() -> FinalResult {
        let mut tbl = PartitionTable::with_capacity(16);
        for (k, v) in [("B", -25), ("A", 10), ("A", 30), ("A", 15)] {
            tbl.accumulate(k.as_bytes(), v).unwrap();
        }
        crate::merge::merge([tbl])
    }

    #[test]
    fn tenths_formatting() {
        assert_eq!(tenths(0), "0.0");
        assert_eq!(tenths(-5), "-0.5");
        assert_eq!(tenths(123), "12.3");
        assert_eq!(tenths(-999), "-99.9");
    }

    #[test]
    fn rows_are_sorted_with_rounded_mean() {
        let rows = rows(&result());
        assert_eq!(
            rows,
            vec![
                Row {
                    key: "A".into(),
                    min: 10,
                    mean: 18,
                    max: 30,
                    count: 3
                },
                Row {
                    key: "B".into(),
                    min: -25,
                    mean: -25,
                    max: -25,
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn compact_format() {
        let mut out = Vec::new();
        write_report(&mut out, &result(), Format::Compact).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "{A=1.0/1.8/3.0, B=-2.5/-2.5/-2.5}\n"
        );
    }

    #[test]
    fn table_format() {
        let mut out = Vec::new();
        write_report(&mut out, &result(), Format::Table).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            format!("{:>25} min   1.0 avg   1.8 max   3.0 cnt {:>10}", "A", 3)
        );
        assert!(lines[1].trim_start().starts_with("B min  -2.5"));
    }

    #[test]
    fn empty_result_renders_braces() {
        let mut out = Vec::new();
        write_report(&mut out, &FinalResult::new(), Format::Compact).unwrap();
        assert_eq!(out, b"{}\n");
    }
}
