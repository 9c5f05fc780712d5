use crate::consent;
use crate::i18n::Lang;
use crate::privacy::PrivacyOptions;
use crate::routes::public::{pages, params};
use crate::stores::AppStores;
use crate::utils::PublicError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};

/// Subscription-management page, the target of the unsubscribe link in
/// every campaign footer.
#[get("/subscription/{campaign_uuid}/{subscriber_uuid}")]
#[tracing::instrument(name = "Subscription page", skip(privacy, lang))]
pub async fn get(
    path: web::Path<(String, String)>,
    privacy: web::Data<PrivacyOptions>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let (campaign_raw, subscriber_raw) = path.into_inner();

    let (campaign, subscriber) = match (
        params::public_id(&campaign_raw),
        params::public_id(&subscriber_raw),
    ) {
        (Ok(c), Ok(s)) => (c, s),
        _ => return pages::not_found(&lang),
    };

    pages::unsubscribe_page(&lang, &privacy, campaign.as_uuid(), subscriber.as_uuid())
}

#[post("/subscription/{campaign_uuid}/{subscriber_uuid}")]
#[tracing::instrument(name = "Unsubscribe", skip(body, stores, privacy, lang))]
pub async fn post(
    path: web::Path<(String, String)>,
    body: String,
    stores: web::Data<AppStores>,
    privacy: web::Data<PrivacyOptions>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let (campaign_raw, subscriber_raw) = path.into_inner();

    match unsubscribe(&stores, &privacy, &campaign_raw, &subscriber_raw, &body).await {
        Ok(()) => pages::message_page(
            StatusCode::OK,
            lang.t("public.unsubbedTitle"),
            lang.t("public.unsubbedInfo"),
        ),
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn unsubscribe(
    stores: &AppStores,
    privacy: &PrivacyOptions,
    campaign_raw: &str,
    subscriber_raw: &str,
    body: &str,
) -> Result<(), PublicError> {
    let campaign = params::public_id(campaign_raw)?;
    let subscriber = params::public_id(subscriber_raw)?;
    let pairs = params::parse_pairs(body)?;
    let blocklist_requested = params::flag(&pairs, "blocklist");

    consent::unsubscribe(
        stores.subscribers.as_ref(),
        privacy,
        subscriber,
        campaign,
        blocklist_requested,
    )
    .await?;

    Ok(())
}
