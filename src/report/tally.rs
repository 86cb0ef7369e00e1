use indexmap::IndexMap;

use crate::core::ReportRow;

/// Frequencies recomputed from the serialized rows, in first-seen order
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Tally {
    pub risks: IndexMap<String, usize>,
    pub tags: IndexMap<String, usize>,
}

impl Tally {
    pub fn from_rows(rows: &[ReportRow]) -> Self {
        let mut tally = Self::default();
        for row in rows {
            *tally.risks.entry(row.risk.as_str().to_string()).or_default() += 1;
            for tag in row.tag_list() {
                *tally.tags.entry(tag.to_string()).or_default() += 1;
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.risks.values().sum()
    }
}
