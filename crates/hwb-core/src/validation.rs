//! Shape checks for the homework status payload.
//!
//! The API answers with loosely-typed JSON. Everything past this module works
//! on `ApiResponse` / `StatusChange`; the raw `serde_json::Value` stage stops
//! here.

use serde_json::Value;

use crate::{
    domain::Watermark,
    errors::{json_type_name, Error},
    Result,
};

const RESPONSE_SCOPE: &str = "ответе API";
const HOMEWORK_SCOPE: &str = "\"homework\"";

/// A homework entry as received, not yet checked.
pub type HomeworkRecord = Value;

/// Review outcome codes the API is known to send.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human verdict sentence for this status.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

/// Status of the most recent homework, extracted from the first record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusChange {
    pub homework_name: String,
    pub status: HomeworkStatus,
}

impl StatusChange {
    pub fn verdict(&self) -> &'static str {
        self.status.verdict()
    }
}

/// A payload that passed the structural checks.
#[derive(Clone, Debug)]
pub struct ApiResponse {
    pub homeworks: Vec<HomeworkRecord>,
    pub current_date: Option<Watermark>,
}

impl ApiResponse {
    pub fn validate(document: Value) -> Result<Self> {
        let homeworks = extract_homeworks(&document)?.to_vec();
        let current_date = document
            .get("current_date")
            .and_then(Value::as_i64)
            .map(Watermark);
        Ok(Self {
            homeworks,
            current_date,
        })
    }

    /// Only the newest record matters; the rest are ignored.
    pub fn latest(&self) -> Option<&HomeworkRecord> {
        self.homeworks.first()
    }
}

/// Check the payload shape and return the (possibly empty) homework list.
pub fn extract_homeworks(response: &Value) -> Result<&[HomeworkRecord]> {
    let Some(obj) = response.as_object() else {
        return Err(Error::InvalidResponseShape {
            found: json_type_name(response),
        });
    };

    let Some(homeworks) = obj.get("homeworks") else {
        return Err(Error::MissingField {
            field: "homeworks",
            scope: RESPONSE_SCOPE,
        });
    };

    match homeworks {
        Value::Array(items) => Ok(items.as_slice()),
        other => Err(Error::InvalidFieldType {
            field: "homeworks",
            expected: "list",
            found: json_type_name(other),
        }),
    }
}

/// Pull the homework name and a known status out of a single record.
pub fn parse_status(record: &HomeworkRecord) -> Result<StatusChange> {
    let Some(obj) = record.as_object() else {
        return Err(Error::InvalidFieldType {
            field: "homework",
            expected: "dict",
            found: json_type_name(record),
        });
    };

    let name = obj.get("homework_name").ok_or(Error::MissingField {
        field: "homework_name",
        scope: HOMEWORK_SCOPE,
    })?;
    let status = obj.get("status").ok_or(Error::MissingField {
        field: "status",
        scope: HOMEWORK_SCOPE,
    })?;

    let name = name.as_str().ok_or(Error::InvalidFieldType {
        field: "homework_name",
        expected: "string",
        found: json_type_name(name),
    })?;
    let code = status.as_str().ok_or(Error::InvalidFieldType {
        field: "status",
        expected: "string",
        found: json_type_name(status),
    })?;

    let status = HomeworkStatus::from_code(code).ok_or_else(|| Error::UnknownStatus {
        status: code.to_string(),
    })?;

    Ok(StatusChange {
        homework_name: name.to_string(),
        status,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn list_payload_is_rejected_as_wrong_shape() {
        let err = extract_homeworks(&json!([{"homeworks": []}])).unwrap_err();
        assert!(matches!(err, Error::InvalidResponseShape { found: "list" }));
    }

    #[test]
    fn missing_homeworks_key() {
        let err = extract_homeworks(&json!({"current_date": 1})).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "homeworks", .. }));
        assert_eq!(
            err.to_string(),
            "Отсутствует необходимый ключ \"homeworks\" в ответе API"
        );
    }

    #[test]
    fn homeworks_must_be_a_list() {
        let err = extract_homeworks(&json!({"homeworks": {"a": 1}})).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidFieldType {
                field: "homeworks",
                expected: "list",
                found: "dict"
            }
        ));
    }

    #[test]
    fn empty_homeworks_is_valid() {
        let doc = json!({"homeworks": [], "current_date": 1000});
        assert!(extract_homeworks(&doc).unwrap().is_empty());

        let resp = ApiResponse::validate(doc).unwrap();
        assert!(resp.latest().is_none());
        assert_eq!(resp.current_date, Some(Watermark(1000)));
    }

    #[test]
    fn current_date_is_optional() {
        let resp = ApiResponse::validate(json!({"homeworks": [], "current_date": "x"})).unwrap();
        assert_eq!(resp.current_date, None);
    }

    #[test]
    fn parses_known_statuses() {
        for (code, status) in [
            ("approved", HomeworkStatus::Approved),
            ("reviewing", HomeworkStatus::Reviewing),
            ("rejected", HomeworkStatus::Rejected),
        ] {
            let got = parse_status(&json!({"homework_name": "P1", "status": code})).unwrap();
            assert_eq!(got.homework_name, "P1");
            assert_eq!(got.status, status);
            assert_eq!(got.status.code(), code);
        }
    }

    #[test]
    fn unknown_status_is_a_hard_error() {
        let err = parse_status(&json!({"homework_name": "P1", "status": "archived"})).unwrap_err();
        match err {
            Error::UnknownStatus { status } => assert_eq!(status, "archived"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn missing_name_is_checked_before_status() {
        let err = parse_status(&json!({})).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "homework_name", .. }));

        let err = parse_status(&json!({"homework_name": "P1"})).unwrap_err();
        assert!(matches!(err, Error::MissingField { field: "status", .. }));
    }

    #[test]
    fn non_object_record_is_a_type_error() {
        let err = parse_status(&json!("P1")).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldType { field: "homework", .. }));

        let err = parse_status(&json!({"homework_name": 7, "status": "approved"})).unwrap_err();
        assert!(matches!(err, Error::InvalidFieldType { field: "homework_name", .. }));
    }
}
