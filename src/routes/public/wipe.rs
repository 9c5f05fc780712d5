use crate::consent::{self, WipeOutcome};
use crate::i18n::Lang;
use crate::privacy::PrivacyOptions;
use crate::routes::public::{pages, params};
use crate::stores::AppStores;
use crate::utils::PublicError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};

/// Permanent self-service deletion. An already-deleted subscriber gets the
/// same confirmation; the second click of a wipe link is not an error.
#[post("/subscription/wipe/{subscriber_uuid}")]
#[tracing::instrument(name = "Wipe subscriber data", skip(stores, privacy, lang))]
pub async fn post(
    path: web::Path<(String,)>,
    stores: web::Data<AppStores>,
    privacy: web::Data<PrivacyOptions>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let subscriber_raw = path.into_inner().0;

    match wipe(&stores, &privacy, &subscriber_raw).await {
        Ok(_) => pages::message_page(
            StatusCode::OK,
            lang.t("public.dataRemovedTitle"),
            lang.t("public.dataRemoved"),
        ),
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn wipe(
    stores: &AppStores,
    privacy: &PrivacyOptions,
    subscriber_raw: &str,
) -> Result<WipeOutcome, PublicError> {
    let subscriber = params::public_id(subscriber_raw)?;
    consent::wipe(stores.subscribers.as_ref(), privacy, subscriber).await
}
