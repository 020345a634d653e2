use std::fmt;

// ---------------------------------------------------------------------------
// CellValue – a single cell of an imported sheet
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value as produced by the workbook decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

impl CellValue {
    /// The text payload, if this is a text cell. Search only looks at these.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            CellValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

/// Display form used by tables and exports. Integral numbers print without a
/// fractional part and `Empty` prints as nothing.
impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Text(s) => write!(f, "{s}"),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Empty => Ok(()),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

// ---------------------------------------------------------------------------
// Record – one data row of the source sheet
// ---------------------------------------------------------------------------

/// One decoded row: an ordered column name → value mapping.
///
/// Key order is the order columns were inserted (sheet column order for
/// decoded records). Records from a ragged sheet may lack keys that other
/// records have; a missing key is simply absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a field. Replacing keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<CellValue>) {
        let key = key.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key, value)),
        }
    }

    /// Builder-style [`Record::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<CellValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Display string for a column; absent and empty cells give `""`.
    pub fn display(&self, key: &str) -> String {
        self.get(key).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = &CellValue> {
        self.fields.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CellValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<CellValue>> FromIterator<(K, V)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (k, v) in iter {
            record.insert(k, v);
        }
        record
    }
}

/// An ordered sequence of records; identity is the position in the sequence.
pub type RecordSet = Vec<Record>;

/// Column names of `records` in order of first appearance, starting with the
/// keys of the first record.
pub fn union_keys<R: std::borrow::Borrow<Record>>(records: &[R]) -> Vec<String> {
    let mut keys: Vec<String> = Vec::new();
    for record in records {
        for key in record.borrow().keys() {
            if !keys.iter().any(|k| k == key) {
                keys.push(key.to_string());
            }
        }
    }
    keys
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_replaces_in_place() {
        let mut rec = Record::new().with("route", "101").with("% Complete", 0.5);
        rec.insert("route", "102");
        assert_eq!(rec.keys().collect::<Vec<_>>(), vec!["route", "% Complete"]);
        assert_eq!(rec.get("route"), Some(&CellValue::Text("102".into())));
    }

    #[test]
    fn display_strings() {
        assert_eq!(CellValue::Number(12.0).to_string(), "12");
        assert_eq!(CellValue::Number(0.75).to_string(), "0.75");
        assert_eq!(CellValue::Bool(false).to_string(), "false");
        assert_eq!(CellValue::Empty.to_string(), "");

        let rec = Record::new().with("a", 0.0);
        assert_eq!(rec.display("a"), "0");
        assert_eq!(rec.display("missing"), "");
    }

    #[test]
    fn union_keys_keeps_first_appearance_order() {
        let records = vec![
            Record::new().with("route", "1").with("% Complete", 0.1),
            Record::new().with("route", "2").with("owner", "kim"),
            Record::new().with("% Complete", 0.3),
        ];
        assert_eq!(union_keys(&records), vec!["route", "% Complete", "owner"]);
        assert!(union_keys::<Record>(&[]).is_empty());
    }
}
