//! Feature layout handler

use axum::Json;

use crate::logic::features::LayoutInfo;

/// Feature names in model input order
pub async fn layout() -> Json<LayoutInfo> {
    Json(LayoutInfo::current())
}
