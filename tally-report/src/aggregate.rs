//! Making result sets comparable and counting who shows up in them.
//!
//! Different queries return different numbers of results, so comparing raw
//! counts favours sources that appear under generous queries. Sets are first
//! cut to a shared length, then counted per source.
use crate::result_set::QueryResultSet;
use std::collections::HashMap;

/// Truncate every query's records to the shortest sequence, bounded by `max_length`.
///
/// Returns the trimmed set and the length that was applied. A set without
/// queries yields `max_length`, or `usize::MAX` when unbounded, so chaining
/// its result into the next trim leaves that set alone.
pub fn trim(mut set: QueryResultSet, max_length: Option<usize>) -> (QueryResultSet, usize) {
    let before = set.total_records();
    let effective = match (set.shortest(), max_length) {
        (Some(shortest), Some(max)) => shortest.min(max),
        (Some(shortest), None) => shortest,
        (None, max) => max.unwrap_or(usize::MAX),
    };
    set.truncate_all(effective);

    tracing::info!(
        target: "report.trim",
        queries = set.len(),
        effective,
        before,
        after = set.total_records(),
        "report.trim"
    );
    (set, effective)
}

/// Trim several independently scraped sets to one shared length.
///
/// Each set is trimmed with the length the previous ones settled on, then all
/// are trimmed again with the final length so that earlier sets catch up with
/// later, shorter ones. Sets without queries do not constrain the length. The
/// reported length is 0 when no set had queries and no bound was given.
pub fn equalize(
    sets: Vec<QueryResultSet>,
    max_length: Option<usize>,
) -> (Vec<QueryResultSet>, usize) {
    let mut bound = max_length;
    let mut first_pass = Vec::with_capacity(sets.len());
    for set in sets {
        let (trimmed, effective) = trim(set, bound);
        bound = Some(effective);
        first_pass.push(trimmed);
    }

    let sets = first_pass
        .into_iter()
        .map(|set| trim(set, bound).0)
        .collect();
    let length = bound.filter(|&n| n != usize::MAX).unwrap_or(0);
    (sets, length)
}

/// One row of a [`SourceBreakdown`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceCounts {
    pub source: String,
    /// Count per query, in query-list order. Queries that were not in the list
    /// follow in the order they were met.
    pub counts: Vec<(String, usize)>,
    pub total: usize,
}

impl SourceCounts {
    /// Count under `query`, 0 when the source never appeared there.
    pub fn count(&self, query: &str) -> usize {
        self.counts
            .iter()
            .find(|(q, _)| q == query)
            .map_or(0, |(_, n)| *n)
    }

    fn bump(&mut self, query: &str) {
        match self.counts.iter_mut().find(|(q, _)| q == query) {
            Some((_, n)) => *n += 1,
            None => self.counts.push((query.to_string(), 1)),
        }
    }
}

/// Results per source and query, ranked by total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceBreakdown {
    rows: Vec<SourceCounts>,
}

impl SourceBreakdown {
    /// Rows by descending total; equal totals keep first-seen order.
    pub fn rows(&self) -> &[SourceCounts] {
        &self.rows
    }

    pub fn get(&self, source: &str) -> Option<&SourceCounts> {
        self.rows.iter().find(|row| row.source == source)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Count each source's records per query.
///
/// Every source gets a zero for each of `queries` it never appeared under.
///
/// ```
/// use tally_report::{QueryResultSet, analyze};
///
/// let breakdown = analyze(&QueryResultSet::new(), &["q1", "q2"]);
/// assert!(breakdown.is_empty());
/// ```
pub fn analyze<Q: AsRef<str>>(set: &QueryResultSet, queries: &[Q]) -> SourceBreakdown {
    let mut rows: Vec<SourceCounts> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for (query, records) in set.iter() {
        for record in records {
            let at = *index.entry(record.source.as_str()).or_insert_with(|| {
                rows.push(SourceCounts {
                    source: record.source.clone(),
                    counts: queries.iter().map(|q| (q.as_ref().to_string(), 0)).collect(),
                    total: 0,
                });
                rows.len() - 1
            });
            rows[at].bump(query);
        }
    }

    for row in &mut rows {
        row.total = row.counts.iter().map(|(_, n)| n).sum();
    }
    rows.sort_by(|a, b| b.total.cmp(&a.total));

    tracing::debug!(
        target: "report.analyze",
        sources = rows.len(),
        "report.analyze"
    );
    SourceBreakdown { rows }
}
