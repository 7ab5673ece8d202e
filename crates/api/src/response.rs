//! Shared response envelope for API handlers.
//!
//! Successful responses are `{ "success": true, "data": ... }`; the error
//! counterpart is built in [`crate::error::AppError`].

use serde::Serialize;

/// Standard `{ "success": true, "data": T }` envelope.
///
/// ```ignore
/// Ok(Json(DataResponse::new(products)))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> DataResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
