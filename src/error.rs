use thiserror::Error;

/// Error kinds raised while rebuilding the judicial debt table.
///
/// Every variant except `QueryNotFound` aborts the run that raised it; an
/// absent rate cell is not an error at all and is dropped inside the
/// normalizer.
#[derive(Error, Debug)]
pub enum TableError {
    /// A fragment's shape matches no reassembly case, or a merge did not
    /// come out at 12 rows.
    #[error("structural fragment error: {0}")]
    StructuralFragment(String),

    /// A month or year label could not be mapped. Identity fields are never
    /// silently dropped.
    #[error("label parse error: {0}")]
    LabelParse(String),

    /// A non-empty rate cell that is still not numeric after cleanup.
    #[error("rate parse error: {0}")]
    ValueParse(String),

    /// The point lookup was called with an argument it cannot read.
    #[error("query input error: {0}")]
    QueryInput(String),

    /// The point lookup matched no row.
    #[error("not found: {0}")]
    QueryNotFound(String),
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
