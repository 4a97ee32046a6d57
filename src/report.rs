//! Order-insensitive helpers for asserting on difference reports.
//!
//! A difference report is a nested JSON mapping in which some values
//! are lists whose internal order carries no meaning (a comparer may
//! enumerate columns or indexes in any order). Comparing two reports
//! for equality therefore has to treat the list values at those paths
//! as sets while staying exact everywhere else.

use serde_json::Value;

/// Walk a nested JSON value by a path of keys.
///
/// ```
/// use migrate_verify::walk_value;
/// use serde_json::json;
///
/// let report = json!({"tables_data": {"employees": {"columns": ["id", "name"]}}});
/// let columns = walk_value(&report, &["tables_data", "employees", "columns"]);
/// assert_eq!(columns, Some(&json!(["id", "name"])));
/// ```
pub fn walk_value<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

fn walk_value_mut<'a>(value: &'a mut Value, path: &[&str]) -> Option<&'a mut Value> {
    path.iter().try_fold(value, |v, key| v.get_mut(*key))
}

/// Order-insensitive equality.
///
/// Arrays are compared as multisets; everything else falls back to
/// plain equality.
pub fn items_equal(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Array(l), Value::Array(r)) => {
            if l.len() != r.len() {
                return false;
            }
            let mut rest: Vec<&Value> = r.iter().collect();
            for item in l {
                match rest.iter().position(|candidate| *candidate == item) {
                    Some(idx) => {
                        rest.swap_remove(idx);
                    }
                    None => return false,
                }
            }
            true
        }
        _ => left == right,
    }
}

/// Copy of a report with the arrays at the given paths sorted into a
/// canonical order. A path that is absent, or does not point at an
/// array, is left untouched.
pub fn normalize_report(report: &Value, unordered_paths: &[&[&str]]) -> Value {
    let mut normalized = report.clone();
    for path in unordered_paths {
        if let Some(Value::Array(items)) = walk_value_mut(&mut normalized, path) {
            items.sort_by_cached_key(Value::to_string);
        }
    }
    normalized
}

/// Structural equality of two difference reports, insensitive to the
/// ordering of the list values at `unordered_paths`.
pub fn reports_equal(left: &Value, right: &Value, unordered_paths: &[&[&str]]) -> bool {
    normalize_report(left, unordered_paths) == normalize_report(right, unordered_paths)
}
