//! Request field parsing. Missing keys, `null` and `""` all count as absent.

use crate::error::AppError;
use crate::model::missing_required_fields;
use chrono::NaiveDate;
use serde_json::{Map, Value};

/// A request body's field map.
#[derive(Debug, Default)]
pub struct Fields(Map<String, Value>);

impl Fields {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        match body {
            Value::Object(m) => Ok(Fields(m)),
            _ => Err(AppError::BadRequest("body must be a JSON object".into())),
        }
    }

    fn present(&self, key: &str) -> Option<&Value> {
        match self.0.get(key) {
            None | Some(Value::Null) => None,
            Some(Value::String(s)) if s.is_empty() => None,
            Some(v) => Some(v),
        }
    }

    /// Validation error unless every key in `keys` is present.
    pub fn require(&self, keys: &[&str]) -> Result<(), AppError> {
        match keys.iter().find(|k| self.present(k).is_none()) {
            Some(missing) => {
                tracing::debug!(field = %missing, "required field absent");
                Err(missing_required_fields())
            }
            None => Ok(()),
        }
    }

    /// Text field; numbers are accepted and rendered as text.
    pub fn text(&self, key: &str) -> Result<Option<String>, AppError> {
        match self.present(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Number(n)) => Ok(Some(n.to_string())),
            Some(_) => Err(AppError::Validation(format!("{} must be a string", key))),
        }
    }

    /// Integer field given as a JSON number or a numeric string.
    pub fn int<T: TryFrom<i64>>(&self, key: &str) -> Result<Option<T>, AppError> {
        let invalid = || AppError::Validation(format!("{} must be an integer", key));
        let n = match self.present(key) {
            None => return Ok(None),
            Some(Value::Number(n)) => n.as_i64().ok_or_else(invalid)?,
            Some(Value::String(s)) => s.trim().parse::<i64>().map_err(|_| invalid())?,
            Some(_) => return Err(invalid()),
        };
        T::try_from(n).map(Some).map_err(|_| invalid())
    }

    /// Key of another row. A value that cannot be an id names no row, so it fails with `unresolved`
    /// exactly like a well-formed id that matches nothing.
    pub fn reference<F>(&self, key: &str, unresolved: F) -> Result<Option<i64>, AppError>
    where
        F: FnOnce() -> AppError,
    {
        self.int::<i64>(key).map_err(|_| unresolved())
    }

    /// `YYYY-MM-DD`; a trailing time part (`2004-05-12T00:00:00Z`) is ignored.
    pub fn date(&self, key: &str) -> Result<Option<NaiveDate>, AppError> {
        let invalid = || AppError::Validation(format!("{} must be a date (YYYY-MM-DD)", key));
        let s = match self.present(key) {
            None => return Ok(None),
            Some(Value::String(s)) => s.as_str(),
            Some(_) => return Err(invalid()),
        };
        let day = match s.split_once('T') {
            Some((day, _)) => day,
            None => s,
        };
        NaiveDate::parse_from_str(day.trim(), "%Y-%m-%d")
            .map(Some)
            .map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(v: Value) -> Fields {
        Fields::from_body(v).unwrap()
    }

    #[test]
    fn rejects_non_object_body() {
        let err = Fields::from_body(json!([1, 2])).unwrap_err();
        assert_eq!(err.code(), "bad_request");
    }

    #[test]
    fn null_and_empty_count_as_absent() {
        let f = fields(json!({"name": "", "email": null, "roll_no": "R1"}));
        assert!(f.require(&["roll_no"]).is_ok());
        assert!(f.require(&["name"]).is_err());
        assert!(f.require(&["email"]).is_err());
        assert!(f.require(&["phone"]).is_err());
        assert_eq!(f.text("name").unwrap(), None);
    }

    #[test]
    fn integers_accept_numbers_and_numeric_strings() {
        let f = fields(json!({"a": 4, "b": "12", "c": "four", "d": 1.5}));
        assert_eq!(f.int::<i32>("a").unwrap(), Some(4));
        assert_eq!(f.int::<i64>("b").unwrap(), Some(12));
        assert!(f.int::<i32>("c").is_err());
        assert!(f.int::<i32>("d").is_err());
        assert_eq!(f.int::<i32>("missing").unwrap(), None);
    }

    #[test]
    fn integers_out_of_range_are_rejected() {
        let f = fields(json!({"credits": 10_000_000_000i64}));
        assert!(f.int::<i32>("credits").is_err());
    }

    #[test]
    fn unusable_reference_reads_as_unresolved() {
        let f = fields(json!({"course_id": "abc", "faculty_id": "7", "student_id": 1.5}));
        let gone = || AppError::NotFound("Course not found".into());
        assert_eq!(f.reference("faculty_id", gone).unwrap(), Some(7));
        assert_eq!(f.reference("missing", gone).unwrap(), None);
        assert_eq!(f.reference("course_id", gone).unwrap_err().code(), "not_found");
        assert_eq!(f.reference("student_id", gone).unwrap_err().code(), "not_found");
    }

    #[test]
    fn dates_parse_with_optional_time_part() {
        let f = fields(json!({"a": "2004-05-12", "b": "2004-05-12T00:00:00.000Z", "c": "12/05/2004"}));
        let expected = NaiveDate::from_ymd_opt(2004, 5, 12);
        assert_eq!(f.date("a").unwrap(), expected);
        assert_eq!(f.date("b").unwrap(), expected);
        assert!(f.date("c").is_err());
    }

    #[test]
    fn numeric_text_is_rendered() {
        let f = fields(json!({"roll_no": 2023001}));
        assert_eq!(f.text("roll_no").unwrap().as_deref(), Some("2023001"));
    }
}
