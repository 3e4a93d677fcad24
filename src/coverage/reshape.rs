use crate::coverage::{
    format_count, format_percent, Axis, DisaggregationTable, OutputRecord, RecordMeta, Series, ServedMetrics,
    UnitMeasure,
};

/// Melt a disaggregation table into long-format records.
///
/// Each category yields four rows: served count, served percent, unserved count,
/// unserved percent. Percentages share the series name of their count and differ
/// only in unit of measure. The Total axis is prefixed with a blank-series row
/// carrying the area's total population.
pub fn reshape_for_output(table: &DisaggregationTable, axis: Axis, area: &str, meta: &RecordMeta) -> Vec<OutputRecord> {
    let record = |category: &str, series: Series, unit_measure: UnitMeasure, value: String| OutputRecord {
        year: meta.year,
        area: area.to_string(),
        axis,
        category: category.to_string(),
        series,
        observation_status: meta.observation_status.clone(),
        unit_multiplier: meta.unit_multiplier.clone(),
        unit_measure,
        value,
    };

    let mut records = Vec::with_capacity(4 * table.len() + 1);

    if axis == Axis::Total {
        let (label, total) = table.iter().next()
            .unwrap_or_else(|| panic!("Total axis table for {area:?} has no category"));
        records.push(record(label, Series::Blank, UnitMeasure::Individual, format_count(total.total)));
    }

    for (label, metrics) in table.iter() {
        let &ServedMetrics { served, unserved, pct_served, pct_unserved, .. } = metrics;
        records.push(record(label, Series::Served, UnitMeasure::Individual, format_count(served)));
        records.push(record(label, Series::Served, UnitMeasure::Percent, format_percent(pct_served)));
        records.push(record(label, Series::Unserved, UnitMeasure::Individual, format_count(unserved)));
        records.push(record(label, Series::Unserved, UnitMeasure::Percent, format_percent(pct_unserved)));
    }

    records
}
