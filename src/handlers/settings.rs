use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    post,
    path = "/settings/range",
    tag = "settings",
    request_body = UpdateRangeRequest,
    responses(
        (status = 200, description = "范围已更新并重建奖池", body = PoolStateResponse),
        (status = 400, description = "范围无效")
    )
)]
/// 变更号码范围。整池重建：清空已抽号码与历史并删除存档
pub async fn update_range(
    service: web::Data<LotteryService>,
    body: web::Json<UpdateRangeRequest>,
) -> Result<HttpResponse> {
    let min_number = body.min_number.unwrap_or(1);
    match service.update_range(min_number, body.max_number).await {
        Ok(state) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": state }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/settings/blacklist",
    tag = "settings",
    request_body = UpdateListRequest,
    responses(
        (status = 200, description = "黑名单已更新", body = UpdateListResponse)
    )
)]
/// 更新黑名单（排除号码）
///
/// 输入支持单个号码与范围（"1-10, 88, 100-105"）；非法或越界 token
/// 静默丢弃。已抽号码保留，新名单只影响剩余池。
pub async fn update_blacklist(
    service: web::Data<LotteryService>,
    body: web::Json<UpdateListRequest>,
) -> Result<HttpResponse> {
    match service.update_blacklist(&body.input).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/settings/whitelist",
    tag = "settings",
    request_body = UpdateListRequest,
    responses(
        (status = 200, description = "白名单已更新", body = UpdateListResponse)
    )
)]
/// 更新白名单（仅从这些号码中抽取；空串恢复为全部号码）
pub async fn update_whitelist(
    service: web::Data<LotteryService>,
    body: web::Json<UpdateListRequest>,
) -> Result<HttpResponse> {
    match service.update_whitelist(&body.input).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn settings_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/settings")
            .route("/range", web::post().to(update_range))
            .route("/blacklist", web::post().to(update_blacklist))
            .route("/whitelist", web::post().to(update_whitelist)),
    );
}
