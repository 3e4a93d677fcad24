use crate::{
    coverage::Category,
    error::Result,
    table::{sum_counts, PopulationTable},
};

/// Served/unserved counts for one category, with percentages of the category total.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ServedMetrics {
    pub total: i64,
    pub served: i64,
    pub unserved: i64,
    /// `None` when `total == 0`.
    pub pct_served: Option<f64>,
    /// `None` when `total == 0`.
    pub pct_unserved: Option<f64>,
}

impl ServedMetrics {
    /// Derive unserved count and percentages from a total and a served count.
    pub fn new(total: i64, served: i64) -> Self {
        let unserved = total - served;
        Self {
            total,
            served,
            unserved,
            pct_served: percentage(served, total),
            pct_unserved: percentage(unserved, total),
        }
    }
}

/// `part / total * 100` rounded half-to-even at two decimals, or `None` for a zero total.
/// Computed in integer hundredths of a percent so that rounding is exact.
pub fn percentage(part: i64, total: i64) -> Option<f64> {
    if total == 0 { return None }

    let numerator = part as i128 * 10_000;
    let total = total as i128;
    let (mut q, r) = (numerator.div_euclid(total), numerator.rem_euclid(total));

    // Ties go to the even neighbour.
    match (2 * r).cmp(&total.abs()) {
        std::cmp::Ordering::Greater => q += 1,
        std::cmp::Ordering::Equal if q % 2 != 0 => q += 1,
        _ => {}
    }

    Some(q as f64 / 100.0)
}

/// The metrics of one disaggregation axis, in category order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisaggregationTable {
    rows: Vec<(String, ServedMetrics)>,
}

impl DisaggregationTable {
    #[inline] pub fn len(&self) -> usize { self.rows.len() }

    #[inline] pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Metrics for the category labelled `label`.
    pub fn get(&self, label: &str) -> Option<&ServedMetrics> {
        self.rows.iter().find(|(l, _)| l == label).map(|(_, m)| m)
    }

    /// Category labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> + '_ {
        self.rows.iter().map(|(l, _)| l.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ServedMetrics)> + '_ {
        self.rows.iter().map(|(l, m)| (l.as_str(), m))
    }

    pub(crate) fn push(&mut self, label: String, metrics: ServedMetrics) {
        self.rows.push((label, metrics));
    }

    pub(crate) fn extend(&mut self, other: DisaggregationTable) {
        self.rows.extend(other.rows);
    }
}

/// For each category column, total population over `population`, served population
/// over `served`, their difference, and percentages of the total.
///
/// `served` must hold at most one row per unit key (deduplicated after the join).
pub fn served_proportions(population: &PopulationTable, served: &PopulationTable, categories: &[Category]) -> Result<DisaggregationTable> {
    let mut table = DisaggregationTable::default();
    for category in categories {
        let total = sum_counts(population.data(), &category.column, "population")?;
        let served = sum_counts(served.data(), &category.column, "served")?;
        table.push(category.label.clone(), ServedMetrics::new(total, served));
    }
    Ok(table)
}
