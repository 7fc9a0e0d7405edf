use actix_web::web;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use crate::models::*;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::lottery::get_state,
        handlers::lottery::draw,
        handlers::lottery::reset,
        handlers::lottery::get_prizes,
        handlers::lottery::select_prize,
        handlers::lottery::get_snapshot_info,
        handlers::lottery::restore,
        handlers::lottery::discard_snapshot,
        handlers::lottery::rolling_start,
        handlers::lottery::rolling_display,
        handlers::lottery::rolling_stop,
        handlers::settings::update_range,
        handlers::settings::update_blacklist,
        handlers::settings::update_whitelist,
        handlers::export::export_csv,
        handlers::export::export_summary,
    ),
    components(
        schemas(
            ApiError,
            DrawRequest,
            DrawResponse,
            DrawRecordResponse,
            PrizeTierResponse,
            PoolStateResponse,
            SelectPrizeRequest,
            UpdateRangeRequest,
            UpdateListRequest,
            UpdateListResponse,
            SnapshotInfoResponse,
            RollingStartRequest,
            RollingDisplayResponse,
            ExportSummaryResponse,
        )
    ),
    tags(
        (name = "lottery", description = "Draw pool API"),
        (name = "rolling", description = "Rolling display API"),
        (name = "settings", description = "Range and filter settings API"),
        (name = "export", description = "Winner list export API"),
    ),
    info(
        title = "Lottery Backend API",
        version = "1.0.0",
        description = "Annual gala lottery draw-pool REST API documentation"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}
