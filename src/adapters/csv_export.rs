//! CSV export of a SIP yearly series.

use std::io::Write;
use std::path::Path;

use crate::domain::error::FinsightError;
use crate::domain::sip::YearPoint;

pub fn write_yearly_series<W: Write>(writer: W, series: &[YearPoint]) -> Result<(), FinsightError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["year", "invested", "projected_value"])?;
    for point in series {
        wtr.write_record(&[
            point.year.to_string(),
            format!("{:.2}", point.invested),
            format!("{:.2}", point.projected_value),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_yearly_series_file(path: &Path, series: &[YearPoint]) -> Result<(), FinsightError> {
    let file = std::fs::File::create(path)?;
    write_yearly_series(file, series)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_header_and_rows() {
        let series = vec![
            YearPoint {
                year: 1,
                invested: 60_000.0,
                projected_value: 64_046.6,
            },
            YearPoint {
                year: 2,
                invested: 120_000.0,
                projected_value: 136_215.56,
            },
        ];
        let mut out = Vec::new();
        write_yearly_series(&mut out, &series).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "year,invested,projected_value\n1,60000.00,64046.60\n2,120000.00,136215.56\n"
        );
    }

    #[test]
    fn empty_series_writes_header_only() {
        let mut out = Vec::new();
        write_yearly_series(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "year,invested,projected_value\n");
    }

    #[test]
    fn writes_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("series.csv");
        write_yearly_series_file(&path, &[]).unwrap();
        assert!(std::fs::read_to_string(&path).unwrap().starts_with("year,"));
    }
}
