//! Fixed field layout of a `bronze_dbo_trans_hst2` change record
//!
//! Every delivery is mapped onto the same 21 business fields. The table
//! below is the single source of truth for field names, value kinds and
//! dashboard labels; both extraction strategies walk it in order.

/// How a field's raw value is coerced when it is extracted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Signed integer; all-digit text is accepted
    Integer,
    /// Free text; scalars are rendered as their plain text
    Text,
    /// Text after passing through the timestamp normalizer
    Timestamp,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub label: &'static str,
}

const fn field(name: &'static str, kind: FieldKind, label: &'static str) -> FieldSpec {
    FieldSpec { name, kind, label }
}

pub const FIELD_COUNT: usize = 21;

/// Known fields, in dashboard display order
pub static FIELDS: [FieldSpec; FIELD_COUNT] = [
    field("record_id", FieldKind::Integer, "Record ID"),
    field("transnbr", FieldKind::Integer, "Transaction Number"),
    field("seqnbr", FieldKind::Integer, "Sequence Number"),
    field("creat_usrnbr", FieldKind::Integer, "Creator User"),
    field("creat_time", FieldKind::Timestamp, "Create Time"),
    field("updat_time", FieldKind::Timestamp, "Update Time"),
    field("authorizer_usrnbr", FieldKind::Integer, "Authorizer User"),
    field("owner_usrnbr", FieldKind::Integer, "Owner User"),
    field("name", FieldKind::Text, "Name"),
    field("description", FieldKind::Text, "Description"),
    field("description2", FieldKind::Text, "Description 2"),
    field("data", FieldKind::Text, "Data"),
    field("external_user", FieldKind::Text, "External User"),
    field("oper", FieldKind::Integer, "Operation"),
    field("protection", FieldKind::Integer, "Protection"),
    field("four_eye_on", FieldKind::Integer, "Four Eye On"),
    field("next_seqnbr", FieldKind::Integer, "Next Seq Number"),
    field("size", FieldKind::Integer, "Size"),
    field("trans_record_type", FieldKind::Integer, "Trans Record Type"),
    field("updat_usrnbr", FieldKind::Integer, "Update User"),
    field("version", FieldKind::Integer, "Version"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_field_names_unique() {
        let names: HashSet<_> = FIELDS.iter().map(|f| f.name).collect();
        assert_eq!(names.len(), FIELD_COUNT);
    }

    #[test]
    fn test_kind_partition() {
        let ints = FIELDS.iter().filter(|f| f.kind == FieldKind::Integer).count();
        let texts = FIELDS.iter().filter(|f| f.kind == FieldKind::Text).count();
        let stamps = FIELDS.iter().filter(|f| f.kind == FieldKind::Timestamp).count();
        assert_eq!((ints, texts, stamps), (14, 5, 2));
    }
}
