//! Local CSV snapshot used when the primary source is unavailable at
//! startup. Read once, read-only; the analytics sinks do not exist in this
//! mode.
//!
//! The file is a small controlled fixture (`nombre, precio, stock` plus
//! optional `referencia`/`descripcion`), so the parser is deliberately
//! minimal: one record per line, double quotes around fields that contain
//! commas.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;

use lagobot_core::ProductRecord;

use crate::error::InventoryError;

const REQUIRED_COLUMNS: &[&str] = &["nombre", "precio", "stock"];

pub fn load_backup(path: &Path) -> Result<Vec<ProductRecord>, InventoryError> {
    let raw = fs::read_to_string(path)
        .map_err(|source| InventoryError::BackupIo { path: path.to_path_buf(), source })?;

    let mut lines = raw.lines().filter(|line| !line.trim().is_empty());
    let Some(header_line) = lines.next() else {
        return Ok(Vec::new());
    };

    let columns: Vec<String> =
        split_line(header_line).iter().map(|name| name.trim().to_lowercase()).collect();
    for required in REQUIRED_COLUMNS {
        if !columns.iter().any(|column| column == required) {
            return Err(InventoryError::BackupFormat {
                path: path.to_path_buf(),
                message: format!("missing required column `{required}`"),
            });
        }
    }

    let index_of = |name: &str| columns.iter().position(|column| column == name);
    let reference_col = index_of("referencia");
    let name_col = index_of("nombre");
    let price_col = index_of("precio");
    let stock_col = index_of("stock");
    let description_col = index_of("descripcion");

    let records = lines
        .filter_map(|line| {
            let cells = split_line(line);
            let cell = |index: Option<usize>| -> String {
                index.and_then(|i| cells.get(i)).map(|value| value.trim().to_string()).unwrap_or_default()
            };

            let name = cell(name_col);
            if name.is_empty() {
                return None;
            }
            Some(ProductRecord {
                reference: cell(reference_col),
                name,
                price: cell(price_col).parse::<Decimal>().ok(),
                stock: cell(stock_col).parse::<i64>().ok(),
                description: cell(description_col),
            })
        })
        .collect();

    Ok(records)
}

/// Splits one CSV line. Double quotes group cells containing commas; a
/// doubled quote inside a quoted cell is an escaped quote.
fn split_line(line: &str) -> Vec<String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '"' if in_quotes && matches!(chars.peek(), Some('"')) => {
                chars.next();
                current.push('"');
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                cells.push(std::mem::take(&mut current));
            }
            other => current.push(other),
        }
    }
    cells.push(current);
    cells
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn write_csv(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("temp csv");
        write!(file, "{content}").expect("write csv");
        file
    }

    #[test]
    fn loads_records_with_all_columns() {
        let file = write_csv(
            "referencia,nombre,precio,stock,descripcion\n\
             REF-300,Refrigerador Haceb 300L,1200000,2,Refrigerador no frost\n\
             TV-55S,TV Samsung 55,2500000,0,\n",
        );

        let records = load_backup(file.path()).expect("backup should load");

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].reference, "REF-300");
        assert_eq!(records[0].price, Some(Decimal::new(1_200_000, 0)));
        assert_eq!(records[1].stock, Some(0));
        assert!(!records[1].in_stock());
    }

    #[test]
    fn minimal_header_without_optional_columns_is_accepted() {
        let file = write_csv("nombre,precio,stock\nLicuadora Oster,180000,5\n");

        let records = load_backup(file.path()).expect("backup should load");

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reference, "");
        assert_eq!(records[0].description, "");
    }

    #[test]
    fn missing_required_column_is_an_error() {
        let file = write_csv("nombre,precio\nLicuadora,180000\n");

        let error = load_backup(file.path()).expect_err("should fail");
        assert!(error.to_string().contains("stock"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let result = load_backup(Path::new("/nonexistent/inventario.csv"));
        assert!(matches!(result, Err(InventoryError::BackupIo { .. })));
    }

    #[test]
    fn quoted_cells_may_contain_commas() {
        let file = write_csv(
            "nombre,precio,stock\n\"Nevera Haceb, dos puertas\",1500000,1\n",
        );

        let records = load_backup(file.path()).expect("backup should load");
        assert_eq!(records[0].name, "Nevera Haceb, dos puertas");
    }

    #[test]
    fn unparseable_numbers_default_to_none() {
        let file = write_csv("nombre,precio,stock\nEstufa Haceb,por definir,muchos\n");

        let records = load_backup(file.path()).expect("backup should load");
        assert_eq!(records[0].price, None);
        assert_eq!(records[0].stock, None);
    }
}
