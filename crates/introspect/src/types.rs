use serde::{Deserialize, Serialize};
use std::fmt;

/// Key name reported for primary keys on every engine
pub const PRIMARY_KEY_NAME: &str = "PRIMARY";

/// Which side of the foreign key the subject table is on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationDirection {
    /// The subject table holds the foreign key and points at `ref_table`
    Outgoing,
    /// `ref_table` holds a foreign key pointing at the subject table
    Incoming,
}

impl RelationDirection {
    pub(crate) fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "outgoing" => Some(Self::Outgoing),
            "incoming" => Some(Self::Incoming),
            _ => None,
        }
    }
}

impl fmt::Display for RelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationDirection::Outgoing => write!(f, "outgoing"),
            RelationDirection::Incoming => write!(f, "incoming"),
        }
    }
}

/// One foreign-key relation between the subject table and another table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKeyRelation {
    /// The related table
    pub ref_table: String,
    /// Column holding the reference, on whichever table owns the constraint
    pub foreign_key: String,
    /// Referenced column
    pub local_key: String,
    pub direction: RelationDirection,
}

impl ForeignKeyRelation {
    pub fn outgoing(
        ref_table: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self {
            ref_table: ref_table.into(),
            foreign_key: foreign_key.into(),
            local_key: local_key.into(),
            direction: RelationDirection::Outgoing,
        }
    }

    pub fn incoming(
        ref_table: impl Into<String>,
        foreign_key: impl Into<String>,
        local_key: impl Into<String>,
    ) -> Self {
        Self {
            ref_table: ref_table.into(),
            foreign_key: foreign_key.into(),
            local_key: local_key.into(),
            direction: RelationDirection::Incoming,
        }
    }

    pub fn is_outgoing(&self) -> bool {
        self.direction == RelationDirection::Outgoing
    }
}

/// One (index, column) row of key metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyDescriptor {
    /// Index or constraint name, [`PRIMARY_KEY_NAME`] for the primary key
    pub key_name: String,
    pub column_name: String,
    pub non_unique: bool,
    /// 1-based position of the column inside the index
    pub seq_in_index: u32,
}

impl KeyDescriptor {
    pub fn new(
        key_name: impl Into<String>,
        column_name: impl Into<String>,
        non_unique: bool,
        seq_in_index: u32,
    ) -> Self {
        Self {
            key_name: key_name.into(),
            column_name: column_name.into(),
            non_unique,
            seq_in_index,
        }
    }

    /// Primary key entry for a column
    pub fn primary(column_name: impl Into<String>, seq_in_index: u32) -> Self {
        Self::new(PRIMARY_KEY_NAME, column_name, false, seq_in_index)
    }

    pub fn is_primary(&self) -> bool {
        self.key_name == PRIMARY_KEY_NAME
    }
}

/// Column metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub data_type: String,
    pub nullable: bool,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable,
        }
    }
}

/// Sort relations by related table, keeping catalog order among equal names
pub(crate) fn sort_relations(relations: &mut [ForeignKeyRelation]) {
    relations.sort_by(|a, b| a.ref_table.cmp(&b.ref_table));
}
