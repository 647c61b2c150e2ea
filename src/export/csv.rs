//! CSV serialization of table rows.

use crate::error::{Error, Result};
use crate::model::descriptor::scalar_to_string;
use crate::model::{Column, Row};
use crate::render::effective_columns;

/// Serialize rows to CSV.
///
/// The header row is the column ids in column order; each record follows
/// in data order. Fields are quoted only when needed and lines end in
/// `\n`, so unchanged input always gives identical bytes.
pub fn write_csv(data: &[Row], columns: &[Column]) -> Result<Vec<u8>> {
    let columns = effective_columns(data, columns);

    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    if !columns.is_empty() {
        writer.write_record(columns.iter().map(|c| c.id.as_str()))?;
        for record in data {
            writer.write_record(
                columns
                    .iter()
                    .map(|c| record.get(&c.id).map(scalar_to_string).unwrap_or_default()),
            )?;
        }
    }

    writer
        .into_inner()
        .map_err(|e| Error::Other(format!("CSV flush error: {}", e.error())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn rows(value: serde_json::Value) -> Vec<Row> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_sales_table() {
        let data = rows(json!([
            {"id": 1, "name": "John", "sales": 100},
            {"id": 2, "name": "Jane", "sales": 200}
        ]));
        let columns = vec![
            Column::numeric("id", "ID"),
            Column::new("name", "Name"),
            Column::numeric("sales", "Sales"),
        ];

        let csv = String::from_utf8(write_csv(&data, &columns).unwrap()).unwrap();
        assert_eq!(csv, "id,name,sales\n1,John,100\n2,Jane,200\n");
    }

    #[test]
    fn test_quoting_and_nulls() {
        let data = rows(json!([{"a": "x, y", "b": null}, {"a": "say \"hi\""}]));
        let columns = vec![Column::new("a", "A"), Column::new("b", "B")];

        let csv = String::from_utf8(write_csv(&data, &columns).unwrap()).unwrap();
        assert_eq!(csv, "a,b\n\"x, y\",\n\"say \"\"hi\"\"\",\n");
    }

    #[test]
    fn test_columns_from_rows() {
        let data = rows(json!([{"k": "v", "n": 2}]));
        let csv = String::from_utf8(write_csv(&data, &[]).unwrap()).unwrap();
        assert_eq!(csv, "k,n\nv,2\n");
    }

    #[test]
    fn test_empty() {
        assert!(write_csv(&[], &[]).unwrap().is_empty());
        let header_only = write_csv(&[], &[Column::new("a", "A")]).unwrap();
        assert_eq!(header_only, b"a\n");
    }

    #[test]
    fn test_byte_stable() {
        let data = rows(json!([{"x": 1.5, "y": "z"}]));
        assert_eq!(write_csv(&data, &[]).unwrap(), write_csv(&data, &[]).unwrap());
    }
}
