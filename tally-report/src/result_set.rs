use tally_youtube::ResultRecord;

/// Results per query, in the order the queries were run.
///
/// Records keep the order in which they were found on the page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryResultSet {
    entries: Vec<(String, Vec<ResultRecord>)>,
}

impl QueryResultSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `records` under `query`. Re-inserting a query replaces its records
    /// but keeps its original position.
    pub fn insert(&mut self, query: impl Into<String>, records: Vec<ResultRecord>) {
        let query = query.into();
        match self.entries.iter_mut().find(|(q, _)| *q == query) {
            Some((_, existing)) => *existing = records,
            None => self.entries.push((query, records)),
        }
    }

    pub fn get(&self, query: &str) -> Option<&[ResultRecord]> {
        self.entries
            .iter()
            .find(|(q, _)| q == query)
            .map(|(_, records)| records.as_slice())
    }

    pub fn queries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(q, _)| q.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[ResultRecord])> {
        self.entries
            .iter()
            .map(|(q, records)| (q.as_str(), records.as_slice()))
    }

    /// Number of queries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records across all queries.
    pub fn total_records(&self) -> usize {
        self.entries.iter().map(|(_, records)| records.len()).sum()
    }

    /// Length of the shortest sequence, `None` without queries.
    pub fn shortest(&self) -> Option<usize> {
        self.entries.iter().map(|(_, records)| records.len()).min()
    }

    pub(crate) fn truncate_all(&mut self, len: usize) {
        for (_, records) in &mut self.entries {
            records.truncate(len);
        }
    }
}

impl<Q: Into<String>> FromIterator<(Q, Vec<ResultRecord>)> for QueryResultSet {
    fn from_iter<I: IntoIterator<Item = (Q, Vec<ResultRecord>)>>(iter: I) -> Self {
        let mut set = Self::new();
        for (query, records) in iter {
            set.insert(query, records);
        }
        set
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Local;

    fn record(id: &str) -> ResultRecord {
        ResultRecord {
            scraped_at: Local::now(),
            page_number: 1,
            age_display: "vor 1 Tag".into(),
            age_seconds: 86_400,
            source: "src".into(),
            title: id.into(),
            video_id: id.into(),
            length: "1:00".into(),
        }
    }

    #[test]
    fn keeps_insertion_order_and_replaces_in_place() {
        let mut set = QueryResultSet::new();
        set.insert("Ukraine", vec![record("a")]);
        set.insert("Inflation", vec![record("b"), record("c")]);
        set.insert("Ukraine", vec![]);

        assert_eq!(set.queries().collect::<Vec<_>>(), ["Ukraine", "Inflation"]);
        assert_eq!(set.get("Ukraine").map(<[_]>::len), Some(0));
        assert_eq!(set.total_records(), 2);
        assert_eq!(set.shortest(), Some(0));
        assert!(set.get("Brexit").is_none());
    }

    #[test]
    fn empty_set_has_no_shortest() {
        let set = QueryResultSet::new();
        assert!(set.is_empty());
        assert_eq!(set.shortest(), None);
    }
}
