use crate::color::Theme;
use crate::config::DashboardConfig;
use crate::data::model::{CellValue, Record};

/// A circular completion gauge derived from one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Gauge {
    pub label: String,
    /// Completion as a fraction, `None` when the record has no usable value.
    pub fraction: Option<f64>,
}

impl Gauge {
    pub fn from_record(record: &Record, label_column: &str, value_column: &str) -> Self {
        Self {
            label: record.display(label_column),
            fraction: record.get(value_column).and_then(completion_fraction),
        }
    }

    /// Whole percent, e.g. `Some(73)` for 0.729.
    pub fn percent(&self) -> Option<i64> {
        self.fraction.map(|f| (f * 100.0).round() as i64)
    }

    /// Text shown in the middle of the ring.
    pub fn percent_text(&self) -> String {
        match self.percent() {
            Some(p) => format!("{p}%"),
            None => "--".to_string(),
        }
    }

    pub fn caption(&self) -> String {
        format!("Route {}", self.label)
    }

    pub fn tooltip(&self) -> String {
        format!("Route: {}\nCompletion: {}", self.label, self.percent_text())
    }
}

/// Numbers are taken as fractions; text is parsed, with a trailing `%`
/// meaning "out of 100".
fn completion_fraction(value: &CellValue) -> Option<f64> {
    let parsed = match value.as_f64() {
        Some(n) => Some(n),
        None => {
            let s = value.as_text()?.trim();
            match s.strip_suffix('%') {
                Some(pct) => pct.trim().parse::<f64>().ok().map(|p| p / 100.0),
                None => s.parse::<f64>().ok(),
            }
        }
    };
    parsed.filter(|f| f.is_finite())
}

/// The gauge grid of one page: the render target for chart snapshots.
#[derive(Debug, Clone, PartialEq)]
pub struct GaugeGrid {
    pub gauges: Vec<Gauge>,
    pub columns: usize,
    pub theme: Theme,
}

impl GaugeGrid {
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a Record>,
        config: &DashboardConfig,
        theme: Theme,
    ) -> Self {
        Self {
            gauges: records
                .into_iter()
                .map(|r| Gauge::from_record(r, &config.label_column, &config.value_column))
                .collect(),
            columns: config.snapshot.columns.max(1),
            theme,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.gauges.is_empty()
    }

    /// `(columns, rows)` actually occupied.
    pub fn dimensions(&self) -> (usize, usize) {
        if self.gauges.is_empty() {
            return (0, 0);
        }
        let cols = self.columns.max(1).min(self.gauges.len());
        (cols, self.gauges.len().div_ceil(cols))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gauge_from_numeric_fraction() {
        let rec = Record::new().with("route", "12").with("% Complete", 0.729);
        let g = Gauge::from_record(&rec, "route", "% Complete");
        assert_eq!(g.percent(), Some(73));
        assert_eq!(g.percent_text(), "73%");
        assert_eq!(g.caption(), "Route 12");
        assert_eq!(g.tooltip(), "Route: 12\nCompletion: 73%");
    }

    #[test]
    fn gauge_from_text_values() {
        let pct = Record::new().with("route", "A").with("% Complete", " 45 % ");
        assert_eq!(Gauge::from_record(&pct, "route", "% Complete").fraction, Some(0.45));

        let plain = Record::new().with("% Complete", "0.9");
        assert_eq!(Gauge::from_record(&plain, "route", "% Complete").fraction, Some(0.9));

        let junk = Record::new().with("% Complete", "soon");
        let g = Gauge::from_record(&junk, "route", "% Complete");
        assert_eq!(g.fraction, None);
        assert_eq!(g.percent_text(), "--");
        assert_eq!(g.label, "");
    }

    #[test]
    fn grid_dimensions() {
        let config = DashboardConfig::default();
        let records: Vec<Record> = (0..6)
            .map(|i| Record::new().with("route", format!("{i}")).with("% Complete", 0.5))
            .collect();
        let grid = GaugeGrid::from_records(&records, &config, Theme::Light);
        assert_eq!(grid.dimensions(), (4, 2));

        let small = GaugeGrid::from_records(&records[..2], &config, Theme::Light);
        assert_eq!(small.dimensions(), (2, 1));

        let none = GaugeGrid::from_records(&records[..0], &config, Theme::Light);
        assert_eq!(none.dimensions(), (0, 0));
    }
}
