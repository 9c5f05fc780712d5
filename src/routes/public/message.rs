use crate::i18n::Lang;
use crate::routes::public::{pages, params};
use crate::stores::AppStores;
use crate::utils::PublicError;
use actix_web::http::header::ContentType;
use actix_web::{HttpResponse, get, web};

/// Hosted HTML view of a campaign message, the target of the "view in
/// browser" link embedded in deliveries.
#[get("/campaign/{campaign_uuid}/{subscriber_uuid}")]
#[tracing::instrument(name = "View campaign message", skip(stores, lang))]
pub async fn get(
    path: web::Path<(String, String)>,
    stores: web::Data<AppStores>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let (campaign_raw, subscriber_raw) = path.into_inner();

    match render_message(&stores, &campaign_raw, &subscriber_raw).await {
        Ok(body) => HttpResponse::Ok()
            .content_type(ContentType::html())
            .body(body),
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn render_message(
    stores: &AppStores,
    campaign_raw: &str,
    subscriber_raw: &str,
) -> Result<String, PublicError> {
    let campaign_id = params::public_id(campaign_raw)?;
    let subscriber_id = params::public_id(subscriber_raw)?;

    let campaign = stores.campaigns.campaign_by_uuid(campaign_id.as_uuid()).await?;
    let subscriber = stores
        .subscribers
        .subscriber_by_uuid(subscriber_id.as_uuid())
        .await?;

    Ok(campaign.render_for(&subscriber))
}
