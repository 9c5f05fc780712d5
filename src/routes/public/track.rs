use crate::domain::PublicId;
use crate::i18n::Lang;
use crate::privacy::PrivacyOptions;
use crate::routes::public::{pages, params};
use crate::stores::AppStores;
use crate::tracking;
use crate::utils::PublicError;
use actix_web::http::header::CacheControl;
use actix_web::{HttpResponse, get, web};

/// Open-tracking pixel. Whatever happens inside (malformed identifiers,
/// preview hits, store failures), the response is the fixed transparent
/// PNG with caching disabled. There is nothing else to send a pixel
/// request towards.
#[get("/campaign/{campaign_uuid}/{subscriber_uuid}/px.png")]
#[tracing::instrument(name = "Register campaign view", skip(stores, privacy))]
pub async fn get(
    path: web::Path<(String, String)>,
    stores: web::Data<AppStores>,
    privacy: web::Data<PrivacyOptions>,
) -> HttpResponse {
    let (campaign_raw, subscriber_raw) = path.into_inner();

    if let (Ok(campaign), Ok(subscriber)) = (
        PublicId::parse(&campaign_raw),
        PublicId::parse(&subscriber_raw),
    ) {
        tracking::record_view(stores.campaigns.as_ref(), &privacy, campaign, Some(subscriber))
            .await;
    }

    HttpResponse::Ok()
        .insert_header(CacheControl(vec![
            actix_web::http::header::CacheDirective::NoCache,
        ]))
        .content_type("image/png")
        .body(tracking::TRACKING_PIXEL.clone())
}

/// Tracked-link redirect. Unlike the pixel, a click has to land somewhere:
/// failing to resolve the destination is a hard error page.
#[get("/link/{link_uuid}/{campaign_uuid}/{subscriber_uuid}")]
#[tracing::instrument(name = "Redirect tracked link", skip(stores, privacy, lang))]
pub async fn link(
    path: web::Path<(String, String, String)>,
    stores: web::Data<AppStores>,
    privacy: web::Data<PrivacyOptions>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let (link_raw, campaign_raw, subscriber_raw) = path.into_inner();

    match resolve(&stores, &privacy, &link_raw, &campaign_raw, &subscriber_raw).await {
        Ok(url) => crate::utils::temporary_redirect(&url),
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn resolve(
    stores: &AppStores,
    privacy: &PrivacyOptions,
    link_raw: &str,
    campaign_raw: &str,
    subscriber_raw: &str,
) -> Result<String, PublicError> {
    let link_id = params::public_id(link_raw)?;
    let campaign = params::public_id(campaign_raw)?;
    let subscriber = params::public_id(subscriber_raw)?;

    tracking::record_click(
        stores.campaigns.as_ref(),
        privacy,
        link_id,
        campaign,
        Some(subscriber),
    )
    .await
}
