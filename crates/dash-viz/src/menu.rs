//! Which charts are offered and which columns feed them.

use dash_model::{ChartKind, ColumnClass, ColumnSets, SelectionKey, SessionState};

/// Whether the column sets satisfy a chart's precondition.
pub fn is_available(chart: ChartKind, sets: &ColumnSets) -> bool {
    let numeric = sets.numeric.len();
    let categorical = sets.categorical.len();
    match chart {
        ChartKind::Histogram => numeric >= 1,
        ChartKind::Bar | ChartKind::Box => categorical >= 1 && numeric >= 1,
        ChartKind::Pie => categorical >= 1,
        ChartKind::Scatter => numeric >= 2,
        ChartKind::Line => !sets.datetime.is_empty() && numeric >= 1,
    }
}

/// Charts offered for these column sets, in menu order.
pub fn available_charts(sets: &ColumnSets) -> Vec<ChartKind> {
    ChartKind::ALL
        .into_iter()
        .filter(|chart| is_available(*chart, sets))
        .collect()
}

/// Columns a selection key may take, in column order.
pub fn eligible_columns(key: SelectionKey, sets: &ColumnSets) -> &[String] {
    sets.get(key.class())
}

/// The column used for `key`: the stored choice when still eligible,
/// otherwise the first eligible column.
pub fn resolve_selection<'a>(
    key: SelectionKey,
    state: &'a SessionState,
    sets: &'a ColumnSets,
) -> Option<&'a str> {
    let class: ColumnClass = key.class();
    match state.get(key) {
        Some(stored) if sets.contains(class, stored) => Some(stored),
        _ => sets.get(class).first().map(String::as_str),
    }
}

#[cfg(test)]
mod tests {
    use dash_model::SelectionRole;

    use super::*;

    fn sets(numeric: &[&str], categorical: &[&str], datetime: &[&str]) -> ColumnSets {
        let owned = |names: &[&str]| names.iter().map(ToString::to_string).collect();
        ColumnSets {
            numeric: owned(numeric),
            categorical: owned(categorical),
            datetime: owned(datetime),
        }
    }

    #[test]
    fn category_and_value() {
        let charts = available_charts(&sets(&["Value"], &["Category"], &[]));
        assert_eq!(
            charts,
            vec![
                ChartKind::Histogram,
                ChartKind::Bar,
                ChartKind::Pie,
                ChartKind::Box
            ]
        );
    }

    #[test]
    fn scatter_needs_two_numeric_columns() {
        assert!(!is_available(ChartKind::Scatter, &sets(&["a"], &[], &[])));
        assert!(is_available(ChartKind::Scatter, &sets(&["a", "b"], &[], &[])));
    }

    #[test]
    fn line_needs_time_and_value() {
        assert!(!is_available(ChartKind::Line, &sets(&[], &[], &["t"])));
        assert!(!is_available(ChartKind::Line, &sets(&["v"], &[], &[])));
        assert!(is_available(ChartKind::Line, &sets(&["v"], &[], &["t"])));
    }

    #[test]
    fn nothing_offered_without_columns() {
        assert!(available_charts(&ColumnSets::default()).is_empty());
    }

    #[test]
    fn stored_selection_wins_when_eligible() {
        let sets = sets(&["a", "b"], &["c"], &[]);
        let key = SelectionKey::new(ChartKind::Histogram, SelectionRole::Column);
        let mut state = SessionState::new();
        assert_eq!(resolve_selection(key, &state, &sets), Some("a"));
        state.set(key, "b");
        assert_eq!(resolve_selection(key, &state, &sets), Some("b"));
    }

    #[test]
    fn ineligible_selection_falls_back() {
        let sets = sets(&["a", "b"], &["c"], &[]);
        let key = SelectionKey::new(ChartKind::Histogram, SelectionRole::Column);
        let mut state = SessionState::new();
        state.set(key, "c");
        assert_eq!(resolve_selection(key, &state, &sets), Some("a"));
        state.set(key, "gone");
        assert_eq!(resolve_selection(key, &state, &sets), Some("a"));
    }

    #[test]
    fn selections_do_not_leak_between_charts() {
        let sets = sets(&["a", "b"], &["c"], &[]);
        let mut state = SessionState::new();
        state.set(SelectionKey::new(ChartKind::Bar, SelectionRole::Value), "b");
        let box_value = SelectionKey::new(ChartKind::Box, SelectionRole::Value);
        assert_eq!(resolve_selection(box_value, &state, &sets), Some("a"));
    }

    #[test]
    fn scatter_axes_both_default_to_first_numeric() {
        let sets = sets(&["a", "b"], &[], &[]);
        let state = SessionState::new();
        let x = SelectionKey::new(ChartKind::Scatter, SelectionRole::X);
        let y = SelectionKey::new(ChartKind::Scatter, SelectionRole::Y);
        assert_eq!(resolve_selection(x, &state, &sets), Some("a"));
        assert_eq!(resolve_selection(y, &state, &sets), Some("a"));
    }
}
