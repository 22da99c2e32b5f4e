use serde::Serialize;

/// Response envelope shared by every endpoint:
/// `{success, data?, message?, pagination?}`.
#[derive(Debug, Clone, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: None,
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            pagination: Some(pagination),
        }
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            pagination: None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(page: i64, limit: i64, total: i64) -> Self {
        let pages = if limit > 0 {
            (total + limit - 1) / limit
        } else {
            0
        };
        Self {
            page,
            limit,
            total,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pages_is_ceil_of_total_over_limit() {
        assert_eq!(Pagination::new(1, 10, 0).pages, 0);
        assert_eq!(Pagination::new(1, 10, 1).pages, 1);
        assert_eq!(Pagination::new(1, 10, 10).pages, 1);
        assert_eq!(Pagination::new(1, 10, 11).pages, 2);
        assert_eq!(Pagination::new(1, 3, 7).pages, 3);
    }

    #[test]
    fn envelope_skips_absent_fields() {
        let body = serde_json::to_value(ApiResponse::data(5)).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "data": 5}));

        let body = serde_json::to_value(ApiResponse::message("done")).unwrap();
        assert_eq!(body, serde_json::json!({"success": true, "message": "done"}));
    }

    #[test]
    fn pagination_serializes_camel_case() {
        let body = serde_json::to_value(Pagination::new(2, 10, 25)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({"page": 2, "limit": 10, "total": 25, "pages": 3})
        );
    }
}
