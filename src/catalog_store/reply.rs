use serde::Serialize;

use super::error::CatalogError;
use super::models::Pagination;

/// Outcome of a catalog operation.
pub type CatalogResult<T> = Result<Reply<T>, CatalogError>;

/// Successful catalog answer: the data, a human-readable message and any
/// listing metadata the operation echoes back.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply<T> {
    pub data: T,
    pub message: String,
    pub extra: ReplyExtra,
}

/// Optional fields some operations add next to `data`.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct ReplyExtra {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
    #[serde(rename = "brandId", skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<i64>,
}

impl<T> Reply<T> {
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Reply {
            data,
            message: message.into(),
            extra: ReplyExtra::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.extra.pagination = Some(pagination);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.extra.query = Some(query.into());
        self
    }

    pub fn with_brand_id(mut self, brand_id: i64) -> Self {
        self.extra.brand_id = Some(brand_id);
        self
    }
}

/// The wire envelope: `{ success, data, message }` plus any extra fields.
///
/// Failures always carry `data: null`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    #[serde(flatten)]
    pub extra: ReplyExtra,
}

impl<T> From<CatalogResult<T>> for ApiResponse<T> {
    fn from(result: CatalogResult<T>) -> Self {
        match result {
            Ok(reply) => ApiResponse {
                success: true,
                data: Some(reply.data),
                message: reply.message,
                extra: reply.extra,
            },
            Err(err) => ApiResponse {
                success: false,
                data: None,
                message: err.to_string(),
                extra: ReplyExtra::default(),
            },
        }
    }
}
