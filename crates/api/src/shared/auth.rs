use crate::error::ChimeError;
use actix_web::HttpRequest;
use chime_infra::ChimeContext;

/// Guard for the periodic notification trigger. The caller must present the
/// configured bearer secret before any work is performed or state is read.
pub fn protect_trigger_route(http_req: &HttpRequest, ctx: &ChimeContext) -> Result<(), ChimeError> {
    let auth_header = http_req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok());

    match auth_header {
        Some(header) if header == format!("Bearer {}", ctx.config.cron_secret) => Ok(()),
        _ => Err(ChimeError::Unauthorized(
            "Missing or invalid bearer token for the notification trigger".into(),
        )),
    }
}
