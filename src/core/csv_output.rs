use crate::domain::model::Table;
use crate::utils::error::{ExportError, Result};

/// UTF-8 byte-order mark; spreadsheet apps use it to detect the encoding.
pub const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Encodes the table as BOM-prefixed CSV.
///
/// Fields are quoted only when they contain a delimiter, quote or line break,
/// with embedded quotes doubled. A table without columns encodes to the bare
/// BOM.
pub fn encode_csv(table: &Table) -> Result<Vec<u8>> {
    let mut buf = UTF8_BOM.to_vec();
    if table.columns.is_empty() {
        return Ok(buf);
    }

    {
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b',')
            .quote_style(csv::QuoteStyle::Necessary)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(&mut buf);

        writer.write_record(&table.columns)?;
        for row in &table.rows {
            writer.write_record(row)?;
        }
        writer.flush()?;
    }

    Ok(buf)
}

/// Reads BOM-prefixed CSV back into a table.
pub fn decode_csv(data: &[u8]) -> Result<Table> {
    let data = data.strip_prefix(UTF8_BOM).unwrap_or(data);
    if data.is_empty() {
        return Ok(Table::default());
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(false)
        .from_reader(data);

    let columns = reader
        .headers()?
        .iter()
        .map(str::to_string)
        .collect::<Vec<_>>();

    let rows = reader
        .records()
        .map(|record| {
            record
                .map(|r| r.iter().map(str::to_string).collect::<Vec<_>>())
                .map_err(ExportError::from)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Table { columns, rows })
}
