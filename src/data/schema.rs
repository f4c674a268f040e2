//! Measurement Schema
//! Canonical column names and categorical orderings shared by every stage.

/// Integer year column.
pub const YEAR: &str = "Year";
/// Calendar month column. Input files may also name it `Month`.
pub const MONTH: &str = "month";
/// Accepted spelling of the month column in raw files.
pub const MONTH_ALIAS: &str = "Month";
/// Season label column.
pub const SEASON: &str = "Season";
/// PM10 concentration column (µg/m³).
pub const PM10: &str = "PM10";

/// Calendar order used both for filtering and for chart axes.
pub const MONTH_ORDER: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Southern hemisphere season order used on the distribution chart.
pub const SEASON_ORDER: [&str; 4] = ["Summer", "Autumn", "Winter", "Spring"];

/// Unit suffix for every concentration shown to the user.
pub const CONCENTRATION_UNIT: &str = "µg/m³";

/// Whether `month` is one of the twelve canonical English month names.
pub fn is_canonical_month(month: &str) -> bool {
    MONTH_ORDER.contains(&month)
}

/// Position of `label` in `order`; labels outside the order sort after it.
pub fn rank_in<S: AsRef<str>>(order: &[S], label: &str) -> usize {
    order
        .iter()
        .position(|known| known.as_ref() == label)
        .unwrap_or(order.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_months_are_exact_names() {
        assert!(is_canonical_month("January"));
        assert!(is_canonical_month("December"));
        assert!(!is_canonical_month("Jan"));
        assert!(!is_canonical_month("january"));
        assert!(!is_canonical_month(" March"));
    }

    #[test]
    fn unknown_labels_rank_last() {
        let order: Vec<String> = SEASON_ORDER.iter().map(|s| s.to_string()).collect();
        assert_eq!(rank_in(&order, "Summer"), 0);
        assert_eq!(rank_in(&order, "Spring"), 3);
        assert_eq!(rank_in(&order, "Monsoon"), 4);
    }
}
