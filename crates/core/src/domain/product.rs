use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A sellable catalog entry as exposed by the data source.
///
/// Source variants do not guarantee every column, so price, stock, and
/// description are defaulted at the boundary instead of failing a row.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub reference: String,
    pub name: String,
    pub price: Option<Decimal>,
    pub stock: Option<i64>,
    #[serde(default)]
    pub description: String,
}

impl ProductRecord {
    pub fn in_stock(&self) -> bool {
        self.stock.map(|units| units > 0).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_stock_counts_as_not_in_stock() {
        let record = ProductRecord { name: "Nevera Haceb 300L".to_string(), ..Default::default() };
        assert!(!record.in_stock());
    }

    #[test]
    fn positive_stock_counts_as_in_stock() {
        let record = ProductRecord { stock: Some(3), ..Default::default() };
        assert!(record.in_stock());
    }
}
