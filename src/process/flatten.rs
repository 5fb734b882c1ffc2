// src/process/flatten.rs

use crate::process::reassemble::TableBlock;

/// One (month, year) cell in long format, labels and rate still raw.
#[derive(Debug, Clone, PartialEq)]
pub struct LongRecord {
    pub mes: String,
    pub ano: String,
    pub taxa: String,
}

/// Enumerate every cell of every block: block order, then row order, then
/// column order.
///
/// Purely order-preserving; malformed labels and empty cells pass through
/// untouched for the normalizer to deal with. All ordering guarantees live
/// in the finalizer's date sort.
pub fn flatten(blocks: &[TableBlock]) -> Vec<LongRecord> {
    let mut records = Vec::new();
    for block in blocks {
        for (month, row) in block.months.iter().zip(&block.rows) {
            for (year, cell) in block.years.iter().zip(row) {
                records.push(LongRecord {
                    mes: month.clone(),
                    ano: year.clone(),
                    taxa: cell.clone(),
                });
            }
        }
    }
    records
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(months: &[&str], years: &[&str], rows: &[&[&str]]) -> TableBlock {
        TableBlock {
            months: months.iter().map(|s| s.to_string()).collect(),
            years: years.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    #[test]
    fn cells_come_out_block_row_column_ordered() {
        let first = block(
            &["JAN", "FEV"],
            &["2023", "2024"],
            &[&["1,10", "2,10"], &["1,20", "2,20"]],
        );
        let second = block(&["JAN"], &["2025"], &[&["3,10"]]);

        let records = flatten(&[first, second]);
        let keys: Vec<(&str, &str, &str)> = records
            .iter()
            .map(|r| (r.mes.as_str(), r.ano.as_str(), r.taxa.as_str()))
            .collect();

        assert_eq!(
            keys,
            vec![
                ("JAN", "2023", "1,10"),
                ("JAN", "2024", "2,10"),
                ("FEV", "2023", "1,20"),
                ("FEV", "2024", "2,20"),
                ("JAN", "2025", "3,10"),
            ]
        );
    }

    #[test]
    fn empty_cells_pass_through() {
        let records = flatten(&[block(&["DEZ"], &["2024"], &[&[""]])]);
        assert_eq!(records[0].taxa, "");
    }
}
