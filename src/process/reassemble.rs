// src/process/reassemble.rs

use crate::error::{TableError, TableResult};
use crate::extract::RawFragment;
use tracing::{debug, warn};

/// Label of the column whose cells identify the month of each row.
pub const MONTH_KEY: &str = "mes";

/// A reconstructed table: 12 month rows spanning one or more year columns.
#[derive(Debug, Clone, PartialEq)]
pub struct TableBlock {
    /// Raw month labels, one per row, in document order (not necessarily
    /// January-first).
    pub months: Vec<String>,
    /// Raw year labels, one per column, possibly with stray whitespace.
    pub years: Vec<String>,
    /// Rate cells, `rows[month][year]`, exactly 12 rows.
    pub rows: Vec<Vec<String>>,
}

/// Rebuild complete 12-row blocks from the extractor's fragments.
///
/// Single forward pass with one-fragment lookahead. A fragment short of 12
/// rows is the front half of a table cut by a page break; its back half
/// arrives as the next fragment, headerless, because the extractor promotes
/// the first row of every block to a header. That one splitting pattern is
/// repaired here; anything else is a structural failure.
#[tracing::instrument(level = "debug", skip(fragments), fields(fragments = fragments.len()))]
pub fn reassemble(fragments: &[RawFragment]) -> TableResult<Vec<TableBlock>> {
    let trailing = RawFragment {
        columns: vec![MONTH_KEY.to_string()],
        rows: Vec::new(),
    };

    let mut blocks = Vec::new();
    let mut consumed_next = false;

    for (n, raw) in fragments.iter().enumerate() {
        if consumed_next {
            // back half already folded into the previous block
            consumed_next = false;
            continue;
        }

        let current = relabel_unnamed(raw);
        let next = fragments
            .get(n + 1)
            .map(relabel_unnamed)
            .unwrap_or_else(|| trailing.clone());

        if current.rows.len() == 12 {
            blocks.push(into_block(current)?);
        } else if current.rows.len() < 12 && next.rows.len() < 12 {
            let merged = merge_undersized(&current, &next)?;
            blocks.push(into_block(merged)?);
            consumed_next = true;
        } else if current.rows.len() < 12 && next.rows.len() == 12 {
            // stray undersized fragment ahead of a complete block; there is
            // nothing to merge it with
            warn!(
                fragment = n,
                rows = current.rows.len(),
                "skipping undersized fragment"
            );
        } else {
            return Err(TableError::StructuralFragment(format!(
                "unrecognized fragment shape at index {}: {} rows, {} in the next fragment",
                n,
                current.rows.len(),
                next.rows.len()
            )));
        }
    }

    debug!(blocks = blocks.len(), "reassembly complete");
    Ok(blocks)
}

/// Give an unnamed leading column the month-key label.
///
/// The month column of a well-formed table carries no header text in the
/// source document, so the extractor reports its label as empty.
fn relabel_unnamed(fragment: &RawFragment) -> RawFragment {
    let mut out = fragment.clone();
    if let Some(first) = out.columns.first_mut() {
        if first.trim().is_empty() {
            *first = MONTH_KEY.to_string();
        }
    }
    out
}

/// Turn a misparsed header back into the data row it really is.
///
/// The column labels become the first row and the columns are renumbered
/// positionally; the caller reassigns real labels afterwards.
fn repair_header(fragment: &RawFragment) -> RawFragment {
    let mut rows = Vec::with_capacity(fragment.rows.len() + 1);
    rows.push(fragment.columns.clone());
    rows.extend(fragment.rows.iter().cloned());

    RawFragment {
        columns: (0..fragment.columns.len()).map(|i| i.to_string()).collect(),
        rows,
    }
}

/// Glue the front half of a split table to its headerless back half.
///
/// Only one layout is mergeable: the front already keyed by `mes`, the back
/// keyed by whatever data row the extractor mistook for a header. The back
/// half adopts the front's column labels over the span it covers, narrower
/// rows are padded, and the result must come out at exactly 12 rows.
fn merge_undersized(current: &RawFragment, next: &RawFragment) -> TableResult<RawFragment> {
    let current_keyed = current.columns.first().map(String::as_str) == Some(MONTH_KEY);
    let next_keyed = next.columns.first().map(String::as_str) == Some(MONTH_KEY);

    if !current_keyed || next_keyed {
        return Err(TableError::StructuralFragment(format!(
            "no merge strategy for column layout: first labels {:?} and {:?}",
            current.columns.first(),
            next.columns.first()
        )));
    }
    if next.columns.len() > current.columns.len() {
        return Err(TableError::StructuralFragment(format!(
            "continuation fragment is wider than its head: {} columns vs {}",
            next.columns.len(),
            current.columns.len()
        )));
    }

    let repaired = repair_header(next);
    let width = current.columns.len();

    let mut rows = current.rows.clone();
    for mut row in repaired.rows {
        row.resize(width, String::new());
        rows.push(row);
    }

    if rows.len() != 12 {
        return Err(TableError::StructuralFragment(format!(
            "merged fragment has {} rows, expected 12",
            rows.len()
        )));
    }

    Ok(RawFragment {
        columns: current.columns.clone(),
        rows,
    })
}

/// Key a complete fragment by its month column.
fn into_block(fragment: RawFragment) -> TableResult<TableBlock> {
    if fragment.rows.len() != 12 {
        return Err(TableError::StructuralFragment(format!(
            "table block must have 12 rows, got {}",
            fragment.rows.len()
        )));
    }

    let key_idx = fragment
        .columns
        .iter()
        .position(|label| label == MONTH_KEY)
        .ok_or_else(|| {
            TableError::StructuralFragment(format!(
                "fragment has no month-key column: {:?}",
                fragment.columns
            ))
        })?;

    let years: Vec<String> = fragment
        .columns
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != key_idx)
        .map(|(_, label)| label.clone())
        .collect();

    let width = fragment.columns.len();
    let mut months = Vec::with_capacity(12);
    let mut rows = Vec::with_capacity(12);
    for mut row in fragment.rows {
        row.resize(width, String::new());
        months.push(row.remove(key_idx));
        rows.push(row);
    }

    Ok(TableBlock { months, years, rows })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MONTHS: [&str; 12] = [
        "JAN", "FEV", "MAR", "ABR", "MAI", "JUN", "JUL", "AGO", "SET", "OUT", "NOV", "DEZ",
    ];

    fn frag(columns: &[&str], rows: &[&[&str]]) -> RawFragment {
        RawFragment {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| s.to_string()).collect())
                .collect(),
        }
    }

    /// A complete 12-row fragment for one year column.
    fn complete(year: &str) -> RawFragment {
        RawFragment {
            columns: vec![MONTH_KEY.to_string(), year.to_string()],
            rows: MONTHS
                .iter()
                .enumerate()
                .map(|(i, m)| vec![m.to_string(), format!("{},0", i + 1)])
                .collect(),
        }
    }

    #[test]
    fn complete_fragments_pass_through_unchanged() -> TableResult<()> {
        let blocks = reassemble(&[complete("2023"), complete("2024")])?;

        assert_eq!(blocks.len(), 2);
        for block in &blocks {
            assert_eq!(block.rows.len(), 12);
            assert_eq!(block.months, MONTHS);
        }
        assert_eq!(blocks[0].years, vec!["2023"]);
        assert_eq!(blocks[1].years, vec!["2024"]);
        assert_eq!(blocks[0].rows[0], vec!["1,0"]);
        Ok(())
    }

    #[test]
    fn unnamed_leading_column_becomes_the_month_key() -> TableResult<()> {
        let mut fragment = complete("2020");
        fragment.columns[0] = String::new();

        let blocks = reassemble(&[fragment])?;
        assert_eq!(blocks[0].months, MONTHS);
        assert_eq!(blocks[0].years, vec!["2020"]);
        Ok(())
    }

    #[test]
    fn split_table_is_merged_back_together() -> TableResult<()> {
        // front half: header survived, eight month rows
        let head = frag(
            &["mes", "2023", "2024"],
            &[
                &["JAN", "1,10", "2,10"],
                &["FEV", "1,20", "2,20"],
                &["MAR", "1,30", "2,30"],
                &["ABR", "1,40", "2,40"],
                &["MAI", "1,50", "2,50"],
                &["JUN", "1,60", "2,60"],
                &["JUL", "1,70", "2,70"],
                &["AGO", "1,80", "2,80"],
            ],
        );
        // back half: the SET row was promoted to a header by the extractor
        let tail = frag(
            &["SET", "1,90", "2,90"],
            &[
                &["OUT", "1,91", "2,91"],
                &["NOV", "1,92", "2,92"],
                &["DEZ", "1,93", "2,93"],
            ],
        );

        let blocks = reassemble(&[head, tail])?;
        assert_eq!(blocks.len(), 1);

        let block = &blocks[0];
        assert_eq!(block.months, MONTHS);
        assert_eq!(block.years, vec!["2023", "2024"]);
        assert_eq!(block.rows[8], vec!["1,90", "2,90"]);
        assert_eq!(block.rows[11], vec!["1,93", "2,93"]);
        Ok(())
    }

    #[test]
    fn consumed_fragment_is_not_revisited() -> TableResult<()> {
        let head = frag(
            &["mes", "2022"],
            &[
                &["JAN", "1,10"],
                &["FEV", "1,20"],
                &["MAR", "1,30"],
                &["ABR", "1,40"],
                &["MAI", "1,50"],
                &["JUN", "1,60"],
                &["JUL", "1,70"],
                &["AGO", "1,80"],
            ],
        );
        let tail = frag(
            &["SET", "1,90"],
            &[&["OUT", "1,91"], &["NOV", "1,92"], &["DEZ", "1,93"]],
        );

        let blocks = reassemble(&[head, tail, complete("2023")])?;
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].years, vec!["2022"]);
        assert_eq!(blocks[1].years, vec!["2023"]);
        Ok(())
    }

    #[test]
    fn narrower_continuation_rows_are_padded() -> TableResult<()> {
        let head = frag(
            &["mes", "2023", "2024"],
            &[
                &["JAN", "1,10", "2,10"],
                &["FEV", "1,20", "2,20"],
                &["MAR", "1,30", "2,30"],
                &["ABR", "1,40", "2,40"],
                &["MAI", "1,50", "2,50"],
                &["JUN", "1,60", "2,60"],
                &["JUL", "1,70", "2,70"],
                &["AGO", "1,80", "2,80"],
            ],
        );
        // continuation only covers the month column and the first year
        let tail = frag(
            &["SET", "1,90"],
            &[&["OUT", "1,91"], &["NOV", "1,92"], &["DEZ", "1,93"]],
        );

        let blocks = reassemble(&[head, tail])?;
        assert_eq!(blocks[0].rows[9], vec!["1,91", ""]);
        Ok(())
    }

    #[test]
    fn stray_undersized_fragment_is_skipped() -> TableResult<()> {
        let stray = frag(&["mes", "2019"], &[&["JAN", "1,10"], &["FEV", "1,20"]]);

        let blocks = reassemble(&[stray, complete("2020")])?;
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].years, vec!["2020"]);
        Ok(())
    }

    #[test]
    fn merge_short_of_twelve_rows_is_fatal() {
        let head = frag(
            &["mes", "2023"],
            &[
                &["JAN", "1,10"],
                &["FEV", "1,20"],
                &["MAR", "1,30"],
                &["ABR", "1,40"],
                &["MAI", "1,50"],
                &["JUN", "1,60"],
            ],
        );
        let tail = frag(&["JUL", "1,70"], &[&["AGO", "1,80"], &["SET", "1,90"]]);

        let err = reassemble(&[head, tail]).unwrap_err();
        assert!(matches!(err, TableError::StructuralFragment(_)), "{err}");
    }

    #[test]
    fn merge_without_a_keyed_front_half_is_fatal() {
        // neither side carries the month key: no merge strategy exists
        let a = frag(&["SET", "1,90"], &[&["OUT", "1,91"]]);
        let b = frag(&["NOV", "1,92"], &[&["DEZ", "1,93"]]);

        let err = reassemble(&[a, b]).unwrap_err();
        assert!(matches!(err, TableError::StructuralFragment(_)), "{err}");
    }

    #[test]
    fn trailing_remainder_with_no_partner_is_fatal() {
        let head = frag(
            &["mes", "2023"],
            &[&["JAN", "1,10"], &["FEV", "1,20"], &["MAR", "1,30"]],
        );

        let err = reassemble(&[complete("2022"), head]).unwrap_err();
        assert!(matches!(err, TableError::StructuralFragment(_)), "{err}");
    }

    #[test]
    fn oversized_fragment_is_fatal() {
        let mut fragment = complete("2021");
        fragment.rows.push(vec!["JAN".to_string(), "9,99".to_string()]);

        let err = reassemble(&[fragment]).unwrap_err();
        assert!(matches!(err, TableError::StructuralFragment(_)), "{err}");
    }

    #[test]
    fn complete_fragment_without_month_key_is_fatal() {
        let mut fragment = complete("2021");
        fragment.columns[0] = "periodo".to_string();

        let err = reassemble(&[fragment]).unwrap_err();
        assert!(matches!(err, TableError::StructuralFragment(_)), "{err}");
    }
}
