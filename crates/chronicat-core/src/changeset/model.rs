use crate::diff::PatchOp;
use chrono::{DateTime, SubsecRound, Utc};

/// One recorded change event for a document.
///
/// `order` is 1-based and strictly increasing per document. The timestamp is
/// kept at millisecond precision so that it survives the wire format intact.
#[derive(Debug, Clone, PartialEq)]
pub struct Changeset {
    document: String,
    order: i64,
    timestamp: DateTime<Utc>,
    fields: Vec<PatchOp>,
}

impl Changeset {
    /// Build a changeset stamped with the current time.
    pub fn new(document: impl Into<String>, order: i64, fields: Vec<PatchOp>) -> Self {
        Self::with_timestamp(document, order, fields, Utc::now())
    }

    /// Build a changeset with an explicit timestamp.
    pub fn with_timestamp(
        document: impl Into<String>,
        order: i64,
        fields: Vec<PatchOp>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            document: document.into(),
            order,
            timestamp: timestamp.trunc_subsecs(3),
            fields,
        }
    }

    pub fn document(&self) -> &str {
        &self.document
    }

    pub fn order(&self) -> i64 {
        self.order
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn fields(&self) -> &[PatchOp] {
        &self.fields
    }

    /// True when no field survived diffing and exclusion.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_truncated_to_millis() {
        let ts = Utc.timestamp_opt(1_700_000_000, 123_456_789).unwrap();
        let cs = Changeset::with_timestamp("doc", 1, vec![], ts);
        assert_eq!(cs.timestamp().timestamp_subsec_nanos(), 123_000_000);
    }

    #[test]
    fn test_empty_changeset() {
        let cs = Changeset::new("doc", 4, vec![]);
        assert!(cs.is_empty());
        assert_eq!(cs.order(), 4);
        assert_eq!(cs.document(), "doc");
    }
}
