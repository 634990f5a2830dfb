use serde::{Deserialize, Deserializer, Serialize};

pub mod token;

/// Deserialize a field the backend sometimes sends as a JSON string and
/// sometimes as a number (`userId`, `idade`) into an owned string.
pub(crate) fn de_opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    match value {
        None | Some(serde_json::Value::Null) => Ok(None),
        Some(serde_json::Value::String(s)) => Ok(Some(s)),
        Some(serde_json::Value::Number(n)) => Ok(Some(n.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "expected string or number, got {other}"
        ))),
    }
}

/// The `points` field of a child is a plain count on the paginated listing
/// and an array of point rows on `/children`; either way the client only
/// cares about how many there are.
pub(crate) fn de_points_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    match value {
        serde_json::Value::Null => Ok(0),
        serde_json::Value::Number(n) => n
            .as_i64()
            .ok_or_else(|| serde::de::Error::custom("points count is not an integer")),
        serde_json::Value::Array(rows) => Ok(rows.len() as i64),
        other => Err(serde::de::Error::custom(format!(
            "expected number or array for points, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Authentication
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Response of `POST /login`. Only `token` matters to the client — role and
/// user id are derived from the token claims, and the mirrored fields here
/// (including the backend's misspelled `AceesAdmin`) are kept for wire
/// completeness only.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(rename = "userId", default, deserialize_with = "de_opt_string_or_number")]
    pub user_id: Option<String>,
    #[serde(rename = "AceesAdmin", default)]
    pub access_admin: Option<serde_json::Value>,
}

// ---------------------------------------------------------------------------
// Children
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Child {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(default)]
    pub avatar: Option<String>,
    /// Server-computed age. Comes back as a string on some endpoints and a
    /// number on others.
    #[serde(rename = "idade", default, deserialize_with = "de_opt_string_or_number")]
    pub age: Option<String>,
    #[serde(rename = "dateOfBirth", default)]
    pub birth_date: Option<String>,
    /// Point count; see [`de_points_count`] for the two wire shapes.
    #[serde(default, deserialize_with = "de_points_count")]
    pub points: i64,
    #[serde(rename = "totalPoints", default)]
    pub total_points: Option<i64>,
    /// Points recorded for this child in the current session, as known to
    /// the server. Used only to seed the client-side overlay.
    #[serde(rename = "pointsAdded", default)]
    pub points_added: Option<u32>,
}

impl Child {
    /// Authoritative total for display: `totalPoints` where the endpoint
    /// provides it, otherwise the size of the points collection.
    pub fn display_total(&self) -> i64 {
        self.total_points.unwrap_or(self.points)
    }
}

/// One page of `GET /children/filterByAge`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ChildPage {
    pub total: i64,
    #[serde(rename = "pageSize")]
    pub page_size: u32,
    #[serde(rename = "currentSkip")]
    pub current_skip: u32,
    #[serde(rename = "hasNextPage")]
    pub has_next_page: bool,
    pub data: Vec<Child>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreateChildRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dateOfBirth")]
    pub birth_date: String,
}

/// The update endpoint receives the desired point total as an array of that
/// many empty objects; the backend drops and recreates the rows to match.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PointStub {}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UpdateChildRequest {
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "dateOfBirth")]
    pub birth_date: String,
    #[serde(rename = "userId")]
    pub user_id: i64,
    pub points: Vec<PointStub>,
}

impl UpdateChildRequest {
    pub fn with_total(name: String, birth_date: String, user_id: i64, total: u32) -> Self {
        Self {
            name,
            birth_date,
            user_id,
            points: (0..total).map(|_| PointStub {}).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeleteChildrenRequest {
    pub ids: Vec<i64>,
}

// ---------------------------------------------------------------------------
// Points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PointRecord {
    pub id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Response of `GET /children/getAllPoints/:classId`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClassPointsResponse {
    #[serde(rename = "classId")]
    pub class_id: i64,
    pub points: Vec<PointRecord>,
}

/// Month bucket used by the per-class points chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthlyCount {
    pub year: i32,
    pub month: u32,
    pub count: u32,
}

impl MonthlyCount {
    pub fn label(&self) -> String {
        format!("{:02}/{}", self.month, self.year)
    }
}

/// Bucket point rows by calendar month, oldest first. Rows whose timestamp
/// does not parse as RFC 3339 are skipped.
pub fn monthly_point_counts(points: &[PointRecord]) -> Vec<MonthlyCount> {
    use chrono::{DateTime, Datelike};

    let mut buckets: std::collections::BTreeMap<(i32, u32), u32> = Default::default();
    for point in points {
        if let Ok(at) = DateTime::parse_from_rfc3339(&point.created_at) {
            *buckets.entry((at.year(), at.month())).or_insert(0) += 1;
        }
    }
    buckets
        .into_iter()
        .map(|((year, month), count)| MonthlyCount { year, month, count })
        .collect()
}

// ---------------------------------------------------------------------------
// Staff and presence
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PresenceRecord {
    pub id: i64,
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StaffUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(rename = "avatarURL", default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub presence: Vec<PresenceRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AddPresenceRequest {
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddPresenceResponse {
    pub id: i64,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error body the backend attaches to failed mutations: `{"error": "..."}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_child_page_wire_names() {
        let json = r#"{
            "total": 42,
            "pageSize": 10,
            "currentSkip": 20,
            "hasNextPage": true,
            "data": [
                {
                    "id": 7,
                    "nome": "Ana Clara",
                    "avatar": "uploads/ana.png",
                    "idade": "6",
                    "dateOfBirth": "2019-03-14",
                    "points": 12,
                    "pointsAdded": 2
                }
            ]
        }"#;

        let page: ChildPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.page_size, 10);
        assert_eq!(page.current_skip, 20);
        assert!(page.has_next_page);

        let child = &page.data[0];
        assert_eq!(child.name, "Ana Clara");
        assert_eq!(child.age.as_deref(), Some("6"));
        assert_eq!(child.points, 12);
        assert_eq!(child.points_added, Some(2));
        assert_eq!(child.display_total(), 12);
    }

    #[test]
    fn test_child_points_as_array() {
        // /children returns the raw rows; only their count matters.
        let json = r#"{
            "id": 3,
            "nome": "Bruno",
            "idade": 8,
            "points": [{}, {}, {}],
            "totalPoints": 3
        }"#;

        let child: Child = serde_json::from_str(json).unwrap();
        assert_eq!(child.points, 3);
        assert_eq!(child.age.as_deref(), Some("8"));
        assert_eq!(child.display_total(), 3);
    }

    #[test]
    fn test_child_missing_optionals() {
        let child: Child = serde_json::from_str(r#"{"id": 1, "nome": "Lia"}"#).unwrap();
        assert_eq!(child.points, 0);
        assert_eq!(child.avatar, None);
        assert_eq!(child.points_added, None);
        assert_eq!(child.display_total(), 0);
    }

    #[test]
    fn test_login_response_numeric_user_id() {
        let json = r#"{"token": "abc", "level": "ADMIN", "userId": 42, "AceesAdmin": true}"#;
        let response: LoginResponse = serde_json::from_str(json).unwrap();
        assert_eq!(response.user_id.as_deref(), Some("42"));
        assert_eq!(response.level.as_deref(), Some("ADMIN"));
    }

    #[test]
    fn test_login_response_token_only() {
        let response: LoginResponse = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        assert_eq!(response.token, "abc");
        assert_eq!(response.user_id, None);
    }

    #[test]
    fn test_update_child_request_point_stubs() {
        let request = UpdateChildRequest::with_total("Ana".into(), "2019-03-14".into(), 5, 3);
        let json = serde_json::to_value(&request).unwrap();

        assert_eq!(json["nome"], "Ana");
        assert_eq!(json["dateOfBirth"], "2019-03-14");
        assert_eq!(json["userId"], 5);
        let points = json["points"].as_array().unwrap();
        assert_eq!(points.len(), 3);
        assert!(points.iter().all(|p| p.as_object().unwrap().is_empty()));
    }

    #[test]
    fn test_update_child_request_zero_total() {
        let request = UpdateChildRequest::with_total("Ana".into(), "2019-03-14".into(), 5, 0);
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["points"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_staff_user_presence_default() {
        let user: StaffUser = serde_json::from_str(r#"{"id": 2, "username": "marta"}"#).unwrap();
        assert!(user.presence.is_empty());

        let user: StaffUser = serde_json::from_str(
            r#"{"id": 2, "username": "marta", "presence": [{"id": 9, "createdAt": "2026-05-02T00:00:00.000Z"}]}"#,
        )
        .unwrap();
        assert_eq!(user.presence.len(), 1);
        assert_eq!(user.presence[0].id, 9);
    }

    #[test]
    fn test_monthly_point_counts() {
        let rows = |dates: &[&str]| -> Vec<PointRecord> {
            dates
                .iter()
                .enumerate()
                .map(|(i, d)| PointRecord {
                    id: i as i64,
                    created_at: (*d).to_string(),
                })
                .collect()
        };

        let points = rows(&[
            "2026-05-02T10:00:00.000Z",
            "2026-05-20T08:30:00.000Z",
            "2026-06-01T00:00:00.000Z",
            "2025-12-31T23:59:59.000Z",
            "not a date",
        ]);

        let counts = monthly_point_counts(&points);
        assert_eq!(counts.len(), 3);
        // Oldest bucket first.
        assert_eq!((counts[0].year, counts[0].month, counts[0].count), (2025, 12, 1));
        assert_eq!((counts[1].year, counts[1].month, counts[1].count), (2026, 5, 2));
        assert_eq!((counts[2].year, counts[2].month, counts[2].count), (2026, 6, 1));
        assert_eq!(counts[1].label(), "05/2026");
    }

    #[test]
    fn test_error_response() {
        let err: ErrorResponse =
            serde_json::from_str(r#"{"error": "limite diário atingido"}"#).unwrap();
        assert_eq!(err.error, "limite diário atingido");
    }

    #[test]
    fn test_presence_request_wire_name() {
        let request = AddPresenceRequest {
            created_at: "2026-05-02T00:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["createdAt"], "2026-05-02T00:00:00.000Z");
    }
}
