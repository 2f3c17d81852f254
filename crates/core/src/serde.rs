//! Serde helpers for the wire encoding of an appointment's assignment.
//!
//! External payloads carry `user_id` as a plain integer where `0` (or an
//! absent/null field) means "not assigned". Inside the crate the assignment is
//! an `Option<i64>` so a real user can never be confused with the sentinel.

use serde::{Deserialize, Deserializer, Serializer};

/// Deserialize a wire `user_id`, treating `0`, `null` and absence as `None`.
pub fn deserialize_user_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let id: Option<i64> = Option::deserialize(deserializer)?;
    Ok(id.filter(|id| *id != 0))
}

/// Serialize an assignment back to the wire integer (`None` becomes `0`).
pub fn serialize_user_id<S>(user_id: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_i64(user_id.unwrap_or(0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestStruct {
        #[serde(
            default,
            deserialize_with = "deserialize_user_id",
            serialize_with = "serialize_user_id"
        )]
        user_id: Option<i64>,
    }

    #[test]
    fn test_zero_is_unassigned() {
        let parsed: TestStruct = serde_json::from_str(r#"{"user_id": 0}"#).unwrap();
        assert_eq!(parsed.user_id, None);
    }

    #[test]
    fn test_null_and_missing_are_unassigned() {
        let parsed: TestStruct = serde_json::from_str(r#"{"user_id": null}"#).unwrap();
        assert_eq!(parsed.user_id, None);

        let parsed: TestStruct = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.user_id, None);
    }

    #[test]
    fn test_assigned_user_is_kept() {
        let parsed: TestStruct = serde_json::from_str(r#"{"user_id": 7}"#).unwrap();
        assert_eq!(parsed.user_id, Some(7));
    }

    #[test]
    fn test_unassigned_serializes_as_zero() {
        let json = serde_json::to_string(&TestStruct { user_id: None }).unwrap();
        assert_eq!(json, r#"{"user_id":0}"#);

        let json = serde_json::to_string(&TestStruct { user_id: Some(7) }).unwrap();
        assert_eq!(json, r#"{"user_id":7}"#);
    }

    #[test]
    fn test_non_integer_is_rejected() {
        let result: Result<TestStruct, _> = serde_json::from_str(r#"{"user_id": "seven"}"#);
        assert!(result.is_err());
    }
}
