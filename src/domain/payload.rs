//! Producer payload extraction
//!
//! The upstream webhook format is not contractually fixed, so payloads are
//! kept as a loose JSON map and each target field is resolved through an
//! ordered list of candidate paths. The first *present* value wins.

use serde_json::{Map, Value};

/// A dotted path into a JSON object, e.g. `etc.amount_to_display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldPath(&'static str);

impl FieldPath {
    pub const fn new(path: &'static str) -> Self {
        Self(path)
    }

    /// Look up the value at this path, descending through nested objects.
    pub fn lookup<'a>(&self, payload: &'a Map<String, Value>) -> Option<&'a Value> {
        let mut segments = self.0.split('.');
        let mut current = payload.get(segments.next()?)?;
        for segment in segments {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }
}

/// Ordered extraction rules for one target field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub sources: &'static [FieldPath],
}

impl FieldRule {
    pub const fn new(sources: &'static [FieldPath]) -> Self {
        Self { sources }
    }

    /// First present raw value among the sources.
    pub fn first_present<'a>(&self, payload: &'a Map<String, Value>) -> Option<&'a Value> {
        self.sources
            .iter()
            .filter_map(|path| path.lookup(payload))
            .find(|value| is_present(value))
    }

    /// First present value rendered as text.
    pub fn text(&self, payload: &Map<String, Value>) -> Option<String> {
        self.first_present(payload).and_then(value_as_text)
    }
}

/// Whether a value counts as supplied.
///
/// Only non-empty strings and non-zero finite numbers are present; `null`,
/// booleans, zero, empty strings, arrays and objects fall through to the next
/// source.
pub fn is_present(value: &Value) -> bool {
    match value {
        Value::String(s) => !s.is_empty(),
        Value::Number(n) => n.as_f64().is_some_and(|f| f.is_finite() && f != 0.0),
        _ => false,
    }
}

fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.is_f64() => n.as_f64().map(float_as_text),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Whole-valued floats render without a fraction (`1.0` becomes `"1"`).
fn float_as_text(f: f64) -> String {
    if f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        f.to_string()
    }
}

/// Rules applied to webhook deliveries
pub mod webhook {
    use super::{FieldPath, FieldRule};

    pub const ID: FieldRule = FieldRule::new(&[FieldPath("id"), FieldPath("created_at")]);

    pub const NAME: FieldRule =
        FieldRule::new(&[FieldPath("donator_name"), FieldPath("name")]);

    pub const AMOUNT: FieldRule = FieldRule::new(&[
        FieldPath("etc.amount_to_display"),
        FieldPath("amount_raw"),
        FieldPath("amount"),
    ]);

    pub const MESSAGE: FieldRule = FieldRule::new(&[FieldPath("message")]);

    pub const DEFAULT_NAME: &str = "Anonymous";
    pub const DEFAULT_MESSAGE: &str = "";
}

/// Rules applied to manually injected test donations
pub mod test_injection {
    use super::{FieldPath, FieldRule};

    pub const NAME: FieldRule = FieldRule::new(&[FieldPath("name")]);
    pub const AMOUNT: FieldRule = FieldRule::new(&[FieldPath("amount")]);
    pub const MESSAGE: FieldRule = FieldRule::new(&[FieldPath("message")]);

    pub const ID_PREFIX: &str = "test_";
    pub const DEFAULT_NAME: &str = "TestDonor";
    pub const DEFAULT_AMOUNT: u64 = 10_000;
    pub const DEFAULT_MESSAGE: &str = "Test donasi dari proxy!";
}
