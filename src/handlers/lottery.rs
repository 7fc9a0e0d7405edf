use crate::models::*;
use crate::services::LotteryService;
use actix_web::{HttpResponse, ResponseError, Result, web};
use serde_json::json;

#[utoipa::path(
    get,
    path = "/lottery/state",
    tag = "lottery",
    responses(
        (status = 200, description = "获取奖池完整状态成功", body = PoolStateResponse)
    )
)]
/// 获取奖池完整状态（范围 / 已抽 / 剩余 / 历史 / 奖项）
pub async fn get_state(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let state = service.state().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": state })))
}

#[utoipa::path(
    post,
    path = "/lottery/draw",
    tag = "lottery",
    request_body = DrawRequest,
    responses(
        (status = 200, description = "抽取成功", body = DrawResponse),
        (status = 400, description = "号码池已空 / 奖项配额已抽完 / 参数错误"),
        (status = 404, description = "奖项不存在")
    )
)]
/// 执行一次抽取:
/// 1. 校验奖项剩余配额（未指定奖项则跳过）
/// 2. 实际数量 = min(请求数量, 配额剩余, 池内剩余)
/// 3. 无放回均匀抽取，整批记入一条历史
pub async fn draw(
    service: web::Data<LotteryService>,
    body: web::Json<DrawRequest>,
) -> Result<HttpResponse> {
    match service.draw(body.count, body.prize_id.as_deref()).await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lottery/reset",
    tag = "lottery",
    responses(
        (status = 200, description = "重置成功", body = PoolStateResponse)
    )
)]
/// 重置奖池：重建号码池、清空历史、奖项恢复满额并删除存档
pub async fn reset(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.reset().await {
        Ok(state) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": state }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lottery/prizes",
    tag = "lottery",
    responses(
        (status = 200, description = "获取奖项列表成功", body = [PrizeTierResponse])
    )
)]
/// 获取奖项配额状态列表
pub async fn get_prizes(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let prizes = service.prizes().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": prizes })))
}

#[utoipa::path(
    post,
    path = "/lottery/prizes/select",
    tag = "lottery",
    request_body = SelectPrizeRequest,
    responses(
        (status = 200, description = "选择奖项成功", body = PrizeTierResponse),
        (status = 404, description = "奖项不存在")
    )
)]
/// 选择当前进行的奖项
pub async fn select_prize(
    service: web::Data<LotteryService>,
    body: web::Json<SelectPrizeRequest>,
) -> Result<HttpResponse> {
    match service.select_prize(&body.prize_id).await {
        Ok(tier) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": tier }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lottery/snapshot",
    tag = "lottery",
    responses(
        (status = 200, description = "获取存档摘要成功", body = SnapshotInfoResponse)
    )
)]
/// 查询是否存在可恢复的存档（用于启动时的恢复提示）
pub async fn get_snapshot_info(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let info = service.snapshot_info().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": info })))
}

#[utoipa::path(
    post,
    path = "/lottery/restore",
    tag = "lottery",
    responses(
        (status = 200, description = "恢复成功", body = PoolStateResponse),
        (status = 404, description = "无存档可恢复")
    )
)]
/// 从存档恢复上次未完成的抽奖会话
pub async fn restore(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.restore().await {
        Ok(state) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": state }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/lottery/snapshot",
    tag = "lottery",
    responses(
        (status = 200, description = "存档已删除")
    )
)]
/// 丢弃存档（用户选择重新开始）
pub async fn discard_snapshot(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.discard_snapshot().await {
        Ok(()) => Ok(HttpResponse::Ok().json(json!({ "success": true }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/lottery/rolling/start",
    tag = "rolling",
    request_body = RollingStartRequest,
    responses(
        (status = 200, description = "滚动展示已启动", body = RollingDisplayResponse),
        (status = 404, description = "奖项不存在")
    )
)]
/// 启动滚动展示（纯装饰的"老虎机"效果，不消耗号码）
pub async fn rolling_start(
    service: web::Data<LotteryService>,
    body: web::Json<RollingStartRequest>,
) -> Result<HttpResponse> {
    match service
        .rolling_start(body.count, body.prize_id.as_deref())
        .await
    {
        Ok(display) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": display }))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/lottery/rolling",
    tag = "rolling",
    responses(
        (status = 200, description = "当前滚动帧", body = RollingDisplayResponse)
    )
)]
/// 获取当前滚动展示帧（前端轮询）
pub async fn rolling_display(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    let display = service.rolling_display().await;
    Ok(HttpResponse::Ok().json(json!({ "success": true, "data": display })))
}

#[utoipa::path(
    post,
    path = "/lottery/rolling/stop",
    tag = "rolling",
    responses(
        (status = 200, description = "滚动停止并完成真实抽取", body = DrawResponse),
        (status = 400, description = "没有进行中的滚动 / 号码池已空 / 奖项配额已抽完")
    )
)]
/// 停止滚动并执行唯一一次真实抽取（启动时的参数生效）
pub async fn rolling_stop(service: web::Data<LotteryService>) -> Result<HttpResponse> {
    match service.rolling_stop().await {
        Ok(result) => Ok(HttpResponse::Ok().json(json!({ "success": true, "data": result }))),
        Err(e) => Ok(e.error_response()),
    }
}

/// 路由配置
pub fn lottery_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/lottery")
            .route("/state", web::get().to(get_state))
            .route("/draw", web::post().to(draw))
            .route("/reset", web::post().to(reset))
            .route("/prizes", web::get().to(get_prizes))
            .route("/prizes/select", web::post().to(select_prize))
            .route("/snapshot", web::get().to(get_snapshot_info))
            .route("/snapshot", web::delete().to(discard_snapshot))
            .route("/restore", web::post().to(restore))
            .route("/rolling/start", web::post().to(rolling_start))
            .route("/rolling", web::get().to(rolling_display))
            .route("/rolling/stop", web::post().to(rolling_stop)),
    );
}
