//! Row decoding shared by the sqlx-backed adapters

use sqlx::{ColumnIndex, Decode, Row, Type};

use crate::error::{SchemaError, SchemaResult};
use crate::types::{ForeignKeyRelation, RelationDirection};

/// Read a named column, mapping decode failures onto [`SchemaError::Decode`]
pub(crate) fn column<'r, R, T>(row: &'r R, name: &str, driver: &str) -> SchemaResult<T>
where
    R: Row,
    T: Decode<'r, R::Database> + Type<R::Database>,
    for<'a> &'a str: ColumnIndex<R>,
{
    row.try_get::<T, _>(name)
        .map_err(|e| SchemaError::decode(driver, format!("column `{}`: {}", name, e)))
}

/// Decode a `ref_table, foreign_key, local_key, direction` relation row
pub(crate) fn relation_row<'r, R>(row: &'r R, driver: &str) -> SchemaResult<ForeignKeyRelation>
where
    R: Row,
    String: Decode<'r, R::Database> + Type<R::Database>,
    for<'a> &'a str: ColumnIndex<R>,
{
    let tag: String = column(row, "direction", driver)?;
    let direction = RelationDirection::from_tag(&tag).ok_or_else(|| {
        SchemaError::decode(driver, format!("unknown relation direction `{}`", tag))
    })?;

    Ok(ForeignKeyRelation {
        ref_table: column(row, "ref_table", driver)?,
        foreign_key: column(row, "foreign_key", driver)?,
        local_key: column(row, "local_key", driver)?,
        direction,
    })
}

/// `YES`/`NO` nullability flags from `information_schema.columns`
pub(crate) fn is_nullable_flag(flag: &str) -> bool {
    flag.eq_ignore_ascii_case("YES")
}
