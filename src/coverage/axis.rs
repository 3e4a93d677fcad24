use std::fmt;

use crate::table::{columns::*, AgeBins, LandUse};

/// A disaggregation axis along which served population is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    Total,
    Age,
    Sex,
    Disability,
    UrbanRural,
}

impl Axis {
    pub const ALL: [Axis; 5] = [Axis::Total, Axis::Age, Axis::Sex, Axis::Disability, Axis::UrbanRural];

    /// Label written to the `Disaggregation` output column.
    pub fn label(&self) -> &'static str {
        match self {
            Axis::Total => "Total",
            Axis::Age => "Age",
            Axis::Sex => "Sex",
            Axis::Disability => "Disability Status",
            Axis::UrbanRural => "Urban/Rural",
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A population count column and the label it is reported under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub column: String,
    pub label: String,
}

impl Category {
    pub fn new(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self { column: column.into(), label: label.into() }
    }
}

/// One aggregation step: the categories of an axis, optionally restricted to a land-use class.
/// An axis may be made of several steps (urban and rural each filter the tables first).
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub axis: Axis,
    pub categories: Vec<Category>,
    pub land_use: Option<LandUse>,
}

/// The declarative list of aggregation steps, in output order.
pub fn axis_specs(bins: &AgeBins) -> Vec<AxisSpec> {
    let mut specs = vec![
        AxisSpec {
            axis: Axis::Total,
            categories: vec![Category::new(TOTAL_POP, "Total")],
            land_use: None,
        },
        AxisSpec {
            axis: Axis::Age,
            categories: bins.labels().into_iter().map(|label| Category::new(label.clone(), label)).collect(),
            land_use: None,
        },
        AxisSpec {
            axis: Axis::Sex,
            categories: vec![Category::new(MALE, "Male"), Category::new(FEMALE, "Female")],
            land_use: None,
        },
        AxisSpec {
            axis: Axis::Disability,
            categories: vec![Category::new(DISABLED, "Disabled"), Category::new(NON_DISABLED, "Non-disabled")],
            land_use: None,
        },
    ];

    specs.extend(LandUse::ALL.into_iter().map(|class| AxisSpec {
        axis: Axis::UrbanRural,
        categories: vec![Category::new(TOTAL_POP, class.label())],
        land_use: Some(class),
    }));

    specs
}
