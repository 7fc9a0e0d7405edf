use crate::models::*;
use crate::services::{LotteryService, export_service};
use actix_web::{HttpResponse, Result, http::header::ContentDisposition, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/export/csv",
    tag = "export",
    responses(
        (status = 200, description = "CSV 中奖名单（每个号码一行）", body = String, content_type = "text/csv"),
        (status = 400, description = "暂无中奖记录可导出")
    )
)]
/// 导出中奖名单 CSV 附件
pub async fn export_csv(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let history = service.draw_history().await;
    if history.is_empty() {
        return Ok(HttpResponse::BadRequest().json(json!({
            "success": false,
            "error": { "code": "EMPTY_HISTORY", "message": "暂无中奖记录可导出" }
        })));
    }

    let csv = export_service::history_to_csv(&history);
    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header(ContentDisposition::attachment(
            export_service::export_filename(),
        ))
        .body(csv))
}

#[utoipa::path(
    get,
    path = "/export/summary",
    tag = "export",
    responses(
        (status = 200, description = "剪贴板文本摘要（每条记录一行）", body = ExportSummaryResponse)
    )
)]
/// 获取文本摘要（前端复制到剪贴板）
pub async fn export_summary(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let history = service.draw_history().await;
    let text = export_service::history_to_summary(&history);
    let data = ExportSummaryResponse {
        lines: history.len(),
        text,
    };
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": data })))
}

/// 路由配置
pub fn export_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/export")
            .route("/csv", web::get().to(export_csv))
            .route("/summary", web::get().to(export_summary)),
    );
}
