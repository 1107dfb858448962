use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Standard response envelope returned by every list endpoint.
///
/// Some endpoints omit `meta` (e.g. when the backend returns the whole
/// result set); consumers synthesize pagination metadata in that case so
/// downstream rendering always sees a consistent shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<PageMeta>,
}

/// Pagination metadata attached to paginated list responses.
///
/// Pages are 1-based everywhere on the wire and in the UI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_page: u32,
}

impl PageMeta {
    /// Metadata stand-in for responses that carried no `meta` block.
    pub fn synthesized(page: u32, limit: u32, row_count: usize) -> Self {
        Self {
            page,
            limit,
            total: row_count as u64,
            total_page: 1,
        }
    }

    /// Number of pages implied by `total` and `limit`, never less than 1
    /// so "Page 1 of 1" stays valid for an empty result set.
    pub fn page_count(&self) -> u32 {
        if self.limit == 0 {
            return 1;
        }
        let pages = (self.total + self.limit as u64 - 1) / self.limit as u64;
        pages.max(1) as u32
    }
}

/// Sort direction as it appears in query strings (`sortOrder=asc|desc`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    /// Parse the query-string literal. Anything other than the two exact
    /// strings is treated as absent, never an error.
    pub fn from_param(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortOrder::Asc),
            "desc" => Some(SortOrder::Desc),
            _ => None,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Publication state of a tour listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TourStatus {
    Active,
    Draft,
    Blocked,
}

impl TourStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TourStatus::Active => "Active",
            TourStatus::Draft => "Draft",
            TourStatus::Blocked => "Blocked",
        }
    }

    /// Query-string value used by the status filter.
    pub fn as_param(&self) -> &'static str {
        match self {
            TourStatus::Active => "ACTIVE",
            TourStatus::Draft => "DRAFT",
            TourStatus::Blocked => "BLOCKED",
        }
    }
}

/// One row of the tours listing as served by `GET /api/tours`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TourSummary {
    pub id: String,
    pub title: String,
    pub destination: String,
    /// Price per person in the marketplace currency.
    pub price: f64,
    /// Average review rating, 0.0 when unreviewed.
    pub rating: f64,
    pub status: TourStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_departure: Option<NaiveDate>,
}

/// Failure surfaced by the API client. Rendered to users as a plain
/// string; never propagated as a panic.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),
    #[error("Server error {status}: {body}")]
    Http { status: u16, body: String },
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("{0}")]
    Rejected(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count_rounds_up() {
        let meta = PageMeta {
            page: 1,
            limit: 10,
            total: 95,
            total_page: 10,
        };
        assert_eq!(meta.page_count(), 10);

        let exact = PageMeta {
            page: 1,
            limit: 10,
            total: 100,
            total_page: 10,
        };
        assert_eq!(exact.page_count(), 10);
    }

    #[test]
    fn test_page_count_never_zero() {
        let empty = PageMeta {
            page: 1,
            limit: 10,
            total: 0,
            total_page: 0,
        };
        assert_eq!(empty.page_count(), 1);

        // Degenerate limit must not divide by zero
        let degenerate = PageMeta {
            page: 1,
            limit: 0,
            total: 50,
            total_page: 1,
        };
        assert_eq!(degenerate.page_count(), 1);
    }

    #[test]
    fn test_synthesized_meta_shape() {
        let meta = PageMeta::synthesized(3, 20, 7);
        assert_eq!(meta.page, 3);
        assert_eq!(meta.limit, 20);
        assert_eq!(meta.total, 7);
        assert_eq!(meta.total_page, 1);
    }

    #[test]
    fn test_envelope_without_meta() {
        let json = r#"{"success":true,"data":[]}"#;
        let envelope: ApiEnvelope<TourSummary> = serde_json::from_str(json).unwrap();
        assert!(envelope.success);
        assert!(envelope.data.is_empty());
        assert!(envelope.meta.is_none());
        assert!(envelope.message.is_none());
    }

    #[test]
    fn test_envelope_camel_case_meta() {
        let json = r#"{
            "success": true,
            "data": [],
            "meta": {"page": 2, "limit": 10, "total": 95, "totalPage": 10}
        }"#;
        let envelope: ApiEnvelope<TourSummary> = serde_json::from_str(json).unwrap();
        let meta = envelope.meta.unwrap();
        assert_eq!(meta.page, 2);
        assert_eq!(meta.total_page, 10);
    }

    #[test]
    fn test_tour_summary_wire_format() {
        let json = r#"{
            "id": "tour_91",
            "title": "Lofoten Midnight Sun Hike",
            "destination": "Norway",
            "price": 480.0,
            "rating": 4.7,
            "status": "ACTIVE",
            "nextDeparture": "2026-06-12"
        }"#;
        let tour: TourSummary = serde_json::from_str(json).unwrap();
        assert_eq!(tour.status, TourStatus::Active);
        assert_eq!(
            tour.next_departure,
            Some(NaiveDate::from_ymd_opt(2026, 6, 12).unwrap())
        );
    }

    #[test]
    fn test_sort_order_literals_only() {
        assert_eq!(SortOrder::from_param("asc"), Some(SortOrder::Asc));
        assert_eq!(SortOrder::from_param("desc"), Some(SortOrder::Desc));
        assert_eq!(SortOrder::from_param("DESC"), None);
        assert_eq!(SortOrder::from_param("ascending"), None);
        assert_eq!(SortOrder::from_param(""), None);
    }

    #[test]
    fn test_api_error_messages() {
        let err = ApiError::Http {
            status: 503,
            body: "Service unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "Server error 503: Service unavailable");
        assert_eq!(
            ApiError::Network("timed out".to_string()).to_string(),
            "Network error: timed out"
        );
    }
}
