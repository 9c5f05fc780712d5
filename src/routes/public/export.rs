use crate::email_client::EmailClient;
use crate::export;
use crate::i18n::Lang;
use crate::privacy::PrivacyOptions;
use crate::routes::public::{pages, params};
use crate::stores::AppStores;
use crate::utils::PublicError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, post, web};

/// Self-service data export. The document is e-mailed, never returned in
/// the response.
#[post("/subscription/export/{subscriber_uuid}")]
#[tracing::instrument(name = "Export subscriber data", skip(stores, privacy, email_client, lang))]
pub async fn post(
    path: web::Path<(String,)>,
    stores: web::Data<AppStores>,
    privacy: web::Data<PrivacyOptions>,
    email_client: web::Data<EmailClient>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let subscriber_raw = path.into_inner().0;

    match dispatch(&stores, &privacy, &email_client, &subscriber_raw).await {
        Ok(()) => pages::message_page(
            StatusCode::OK,
            lang.t("public.dataSentTitle"),
            lang.t("public.dataSent"),
        ),
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn dispatch(
    stores: &AppStores,
    privacy: &PrivacyOptions,
    email_client: &EmailClient,
    subscriber_raw: &str,
) -> Result<(), PublicError> {
    let subscriber = params::public_id(subscriber_raw)?;
    export::dispatch_export(
        stores.subscribers.as_ref(),
        privacy,
        email_client,
        subscriber,
    )
    .await
}
