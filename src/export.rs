use std::io;
use std::path::Path;

use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::models::{Cgpa, RankedRecord};

#[derive(Serialize)]
struct ExportRow<'a> {
    rank: usize,
    name: &'a str,
    enrolment_no: &'a str,
    apaar_id: &'a str,
    cgpa: Cgpa,
    branch: &'a str,
}

/// Writes `rows` as CSV with a header line and returns the row count.
pub fn write_csv<W: io::Write>(writer: W, rows: &[RankedRecord]) -> Result<usize> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    for row in rows {
        csv_writer.serialize(ExportRow {
            rank: row.rank,
            name: &row.record.name,
            enrolment_no: &row.record.enrolment_no,
            apaar_id: &row.record.apaar_id,
            cgpa: row.record.cgpa,
            branch: &row.record.branch,
        })?;
    }

    csv_writer.flush().map_err(csv::Error::from)?;
    Ok(rows.len())
}

pub fn export_csv(path: &Path, rows: &[RankedRecord]) -> Result<usize> {
    let file = std::fs::File::create(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(file, rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StudentRecord;

    fn ranked(rank: usize, name: &str, cgpa: Cgpa) -> RankedRecord {
        RankedRecord {
            rank,
            record: StudentRecord {
                name: name.to_string(),
                enrolment_no: "IIT2023014".to_string(),
                apaar_id: "482913067215".to_string(),
                cgpa,
                branch: "IIT".to_string(),
            },
        }
    }

    #[test]
    fn writes_header_and_sentinels() {
        let rows = vec![
            ranked(1, "Aarav Sharma", Cgpa::Value(8.72)),
            ranked(2, "Zoya Khan", Cgpa::Unavailable),
        ];
        let mut buffer = Vec::new();
        let written = write_csv(&mut buffer, &rows).unwrap();
        assert_eq!(written, 2);

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "rank,name,enrolment_no,apaar_id,cgpa,branch");
        assert_eq!(lines[1], "1,Aarav Sharma,IIT2023014,482913067215,8.72,IIT");
        assert_eq!(lines[2], "2,Zoya Khan,IIT2023014,482913067215,N/A,IIT");
    }

    #[test]
    fn export_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ranked.csv");
        export_csv(&path, &[ranked(1, "Kabir Singh", Cgpa::Value(7.65))]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Kabir Singh"));
    }
}
