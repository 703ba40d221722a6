use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

use crate::chat::strings;

/// Fixed text bundle for the hosting shell: title, greeting, mode labels
/// and the per-mode guidance shown in the sidebar.
pub async fn get_ui_strings() -> impl IntoResponse {
    Json(json!({
        "app_title": strings::APP_TITLE,
        "greeting": strings::GREETING_MESSAGE,
        "warning": {
            "icon": strings::WARNING_ICON,
            "text": strings::WARNING_MESSAGE,
        },
        "modes": [
            {
                "label": strings::ANSWER_MODE_DOC_SEARCH,
                "guide": strings::DOC_SEARCH_GUIDE,
                "example": strings::DOC_SEARCH_EXAMPLE,
            },
            {
                "label": strings::ANSWER_MODE_INQUIRY,
                "guide": strings::INQUIRY_GUIDE,
                "example": strings::INQUIRY_EXAMPLE,
            },
        ],
    }))
}
