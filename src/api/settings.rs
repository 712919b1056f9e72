use axum::{
    extract::State,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use super::AppState;
use super::error::ApiResult;
use super::response::{success, success_message};

/// 设置视图，API key 只返回掩码
#[derive(Debug, Serialize)]
pub struct SettingsView {
    pub has_personal_api_key: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub personal_api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    pub personal_api_key: Option<String>,
}

/// 获取当前设置
pub async fn get_settings(State(state): State<AppState>) -> impl IntoResponse {
    let settings = state.config_manager.get_settings().await;
    let key = settings.client_key();

    success(SettingsView {
        has_personal_api_key: key.is_some(),
        personal_api_key: key.map(mask_key),
    })
}

/// 更新个人 API key
pub async fn update_settings(
    State(state): State<AppState>,
    Json(request): Json<UpdateSettingsRequest>,
) -> ApiResult<impl IntoResponse> {
    state
        .config_manager
        .set_personal_api_key(request.personal_api_key)
        .await?;

    Ok(success_message("Settings saved"))
}

/// 只保留末尾 4 个字符
fn mask_key(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= 4 {
        return "****".to_string();
    }

    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("****{}", tail)
}
