mod common;

use std::fs;

use common::{init_test_tracing, record, scraped_at};
use tally_report::export::{write_analysis_to, write_results_to};
use tally_report::{QueryResultSet, analyze, equalize, write_analysis, write_results};

fn sample_set() -> QueryResultSet {
    QueryResultSet::from_iter([
        (
            "Brexit",
            vec![
                record("BBC News", "b1", "3:10"),
                record("Sky News", "b2", "LIVE"),
                record("BBC News", "b3", "12:00"),
            ],
        ),
        (
            "Corona",
            vec![
                record("tagesschau", "c1", "1:30"),
                record("BBC News", "c2", "2:45"),
            ],
        ),
    ])
}

#[test]
fn results_csv_is_semicolon_separated_and_fully_quoted() {
    let mut out = Vec::new();
    write_results_to(&mut out, &sample_set()).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.split("\r\n").collect();

    assert_eq!(
        lines[0],
        "\"search term\";\"date scraped\";\"results page no\";\"age as displayed\";\
         \"age in seconds\";\"source\";\"title\";\"url\";\"length\""
    );
    assert_eq!(
        lines[1],
        "\"Brexit\";\"2023-02-14-18-30-00\";\"1\";\"vor 3 Stunden\";\"10800\";\
         \"BBC News\";\"Video b1\";\"b1\";\"3:10\""
    );
    assert!(lines[2].ends_with("\"b2\";\"LIVE\""));
    assert!(lines[4].starts_with("\"Corona\""));
    // header + 5 rows + trailing empty segment
    assert_eq!(lines.len(), 7);
    assert_eq!(lines[6], "");
}

#[test]
fn quotes_inside_fields_are_doubled() {
    let mut set = QueryResultSet::new();
    let mut tricky = record("Der \"Spiegel\"", "s1", "1:00");
    tricky.title = "a;b".to_string();
    set.insert("Spiegel", vec![tricky]);

    let mut out = Vec::new();
    write_results_to(&mut out, &set).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert!(text.contains("\"Der \"\"Spiegel\"\"\";\"a;b\";\"s1\""));
}

#[test]
fn analysis_csv_follows_query_order_and_rank() {
    let set = sample_set();
    let queries = ["Brexit", "Corona"];
    let breakdown = analyze(&set, &queries);

    let mut out = Vec::new();
    write_analysis_to(&mut out, &breakdown, &queries).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert_eq!(
        text,
        "\"source\";\"Brexit\";\"Corona\";\"total\"\r\n\
         \"BBC News\";\"2\";\"1\";\"3\"\r\n\
         \"Sky News\";\"1\";\"0\";\"1\"\r\n\
         \"tagesschau\";\"0\";\"1\";\"1\"\r\n"
    );
}

#[test]
fn trimmed_run_writes_both_files() {
    init_test_tracing();
    let dir = tempfile::tempdir().unwrap();
    let out_dir = dir.path().join("out");

    let (sets, length) = equalize(vec![sample_set()], None);
    assert_eq!(length, 2);
    let set = &sets[0];
    let queries: Vec<&str> = set.queries().collect();

    let results = write_results(&out_dir, "results-1-trimmed", set, scraped_at()).unwrap();
    let analysis = write_analysis(
        &out_dir,
        "analysis-1",
        &analyze(set, &queries),
        &queries,
        scraped_at(),
    )
    .unwrap();

    assert_eq!(
        results.file_name().unwrap(),
        "2023-02-14-18-30-00-results-1-trimmed.csv"
    );
    assert_eq!(
        analysis.file_name().unwrap(),
        "2023-02-14-18-30-00-analysis-1.csv"
    );

    let rows = fs::read_to_string(&results).unwrap();
    assert_eq!(rows.lines().count(), 1 + 4);
    assert!(!rows.contains("\"b3\""));

    let ranked = fs::read_to_string(&analysis).unwrap();
    let lines: Vec<&str> = ranked.lines().collect();
    assert_eq!(lines[1], "\"BBC News\";\"1\";\"1\";\"2\"");
    assert_eq!(lines.len(), 4);
}
