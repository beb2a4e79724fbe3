//! Column classification by kind.

use dash_model::{ColumnKind, ColumnSets, Dataset};
use tracing::debug;

/// Splits column names into numeric, categorical and datetime sets.
///
/// Boolean and unrecognised columns are left out of every set.
pub fn classify_columns(dataset: &Dataset) -> ColumnSets {
    let mut sets = ColumnSets::default();
    for column in dataset.schema() {
        match column.kind {
            ColumnKind::Integer | ColumnKind::Float => sets.numeric.push(column.name.clone()),
            ColumnKind::Text => sets.categorical.push(column.name.clone()),
            ColumnKind::Datetime => sets.datetime.push(column.name.clone()),
            ColumnKind::Boolean | ColumnKind::Other => {}
        }
    }
    debug!(
        numeric = sets.numeric.len(),
        categorical = sets.categorical.len(),
        datetime = sets.datetime.len(),
        skipped = dataset.width() - sets.len(),
        "columns classified"
    );
    sets
}
