//! Data line decoding through a header's position map.

use crate::codec::{decode, Value};
use crate::error::{ErrorCatalog, MzTabError};
use crate::schema::ColumnSchema;
use crate::table::Record;

/// Decode the fields of one data line. A field that does not decode is
/// reported and stored as `null`.
///
/// `fields` and `positions` are both in physical order and have the same
/// length; the caller checks the count against the schema first.
pub(crate) fn decode_row(
    schema: &ColumnSchema,
    positions: &[u32],
    fields: &[&str],
    line: usize,
    catalog: &ErrorCatalog,
    diagnostics: &mut Vec<MzTabError>,
) -> Record {
    let mut record = Record::new();
    record.line = line;
    for (raw, &position) in fields.iter().zip(positions) {
        let Some(column) = schema.column_at(position) else {
            continue;
        };
        let value = match decode(raw, &column.value_type) {
            Ok(value) => value,
            Err(e) => {
                diagnostics.push(e.to_error(catalog, line, &column.header));
                Value::Null
            }
        };
        record.set(position, value);
    }
    record
}
