//! CSV files in the layout downstream spreadsheets expect: `;` separated,
//! every field quoted, CRLF line ends, a timestamp prefix on the file name.
use crate::aggregate::SourceBreakdown;
use crate::result_set::QueryResultSet;
use chrono::{DateTime, Local};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Used for file names and the `date scraped` column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

pub const RESULT_HEADERS: [&str; 9] = [
    "search term",
    "date scraped",
    "results page no",
    "age as displayed",
    "age in seconds",
    "source",
    "title",
    "url",
    "length",
];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("cannot write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("csv encoding failed: {0}")]
    Csv(#[from] csv::Error),
}

/// `<timestamp>-<name>.csv`
pub fn file_name(name: &str, now: DateTime<Local>) -> String {
    format!("{}-{name}.csv", now.format(TIMESTAMP_FORMAT))
}

fn csv_writer<W: Write>(out: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b';')
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(out)
}

/// One row per record, queries in set order.
pub fn write_results_to<W: Write>(out: W, set: &QueryResultSet) -> Result<(), ExportError> {
    let mut wtr = csv_writer(out);
    wtr.write_record(RESULT_HEADERS)?;
    for (query, records) in set.iter() {
        for record in records {
            let scraped = record.scraped_at.format(TIMESTAMP_FORMAT).to_string();
            let page = record.page_number.to_string();
            let age = record.age_seconds.to_string();
            wtr.write_record([
                query,
                scraped.as_str(),
                page.as_str(),
                record.age_display.as_str(),
                age.as_str(),
                record.source.as_str(),
                record.title.as_str(),
                record.video_id.as_str(),
                record.length.as_str(),
            ])?;
        }
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Header `source`, one column per entry of `queries`, `total`; rows in rank order.
///
/// Queries counted in `breakdown` but missing from `queries` get columns after
/// the listed ones, so each row's cells add up to its total.
pub fn write_analysis_to<W: Write, Q: AsRef<str>>(
    out: W,
    breakdown: &SourceBreakdown,
    queries: &[Q],
) -> Result<(), ExportError> {
    let mut wtr = csv_writer(out);

    let mut columns: Vec<&str> = queries.iter().map(|q| q.as_ref()).collect();
    for row in breakdown.rows() {
        for (query, _) in &row.counts {
            if !columns.contains(&query.as_str()) {
                columns.push(query);
            }
        }
    }

    let mut header = vec!["source"];
    header.extend(&columns);
    header.push("total");
    wtr.write_record(&header)?;

    for row in breakdown.rows() {
        let mut fields = Vec::with_capacity(columns.len() + 2);
        fields.push(row.source.clone());
        fields.extend(columns.iter().map(|q| row.count(q).to_string()));
        fields.push(row.total.to_string());
        wtr.write_record(&fields)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `set` to `<dir>/<timestamp>-<name>.csv` and return the path.
pub fn write_results(
    dir: &Path,
    name: &str,
    set: &QueryResultSet,
    now: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name(name, now));
    let file = create(&path)?;
    write_results_to(file, set)?;
    tracing::info!(
        target: "report.export",
        path = %path.display(),
        rows = set.total_records(),
        "report.export.results"
    );
    Ok(path)
}

/// Write `breakdown` to `<dir>/<timestamp>-<name>.csv` and return the path.
pub fn write_analysis<Q: AsRef<str>>(
    dir: &Path,
    name: &str,
    breakdown: &SourceBreakdown,
    queries: &[Q],
    now: DateTime<Local>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(file_name(name, now));
    let file = create(&path)?;
    write_analysis_to(file, breakdown, queries)?;
    tracing::info!(
        target: "report.export",
        path = %path.display(),
        rows = breakdown.len(),
        "report.export.analysis"
    );
    Ok(path)
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    File::create(path).map(BufWriter::new).map_err(io_err)
}
