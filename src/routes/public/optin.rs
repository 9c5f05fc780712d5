use crate::consent::{self, ConfirmOutcome};
use crate::i18n::Lang;
use crate::routes::public::{pages, params};
use crate::stores::AppStores;
use crate::utils::PublicError;
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, get, post, web};

/// Double opt-in confirmation page. Lists pending confirmations, narrowed
/// by the repeated `l` query parameter; an empty filter means every list
/// still waiting.
#[get("/subscription/optin/{subscriber_uuid}")]
#[tracing::instrument(name = "Opt-in page", skip(request, stores, lang))]
pub async fn get(
    path: web::Path<(String,)>,
    request: HttpRequest,
    stores: web::Data<AppStores>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let subscriber_raw = path.into_inner().0;

    match pending_page(&stores, &lang, &subscriber_raw, request.query_string()).await {
        Ok(response) => response,
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn pending_page(
    stores: &AppStores,
    lang: &Lang,
    subscriber_raw: &str,
    query: &str,
) -> Result<HttpResponse, PublicError> {
    let subscriber = params::public_id(subscriber_raw)?;
    let pairs = params::parse_pairs(query)?;
    let lists = params::list_filter(&pairs)?;

    let pending =
        consent::pending_confirmations(stores.subscribers.as_ref(), subscriber, &lists).await?;
    if pending.is_empty() {
        return Err(PublicError::NoPendingAction);
    }

    Ok(pages::optin_page(lang, subscriber.as_uuid(), &pending))
}

/// Confirmation submit. Without `confirm=true` it behaves like the page
/// fetch, so a stale form replay is harmless.
#[post("/subscription/optin/{subscriber_uuid}")]
#[tracing::instrument(name = "Confirm opt-in subscription", skip(body, stores, lang))]
pub async fn post(
    path: web::Path<(String,)>,
    body: String,
    stores: web::Data<AppStores>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    let subscriber_raw = path.into_inner().0;

    match confirm(&stores, &lang, &subscriber_raw, &body).await {
        Ok(response) => response,
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn confirm(
    stores: &AppStores,
    lang: &Lang,
    subscriber_raw: &str,
    body: &str,
) -> Result<HttpResponse, PublicError> {
    let subscriber = params::public_id(subscriber_raw)?;
    let pairs = params::parse_pairs(body)?;
    let lists = params::list_filter(&pairs)?;

    if !params::flag(&pairs, "confirm") {
        let pending =
            consent::pending_confirmations(stores.subscribers.as_ref(), subscriber, &lists)
                .await?;
        if pending.is_empty() {
            return Err(PublicError::NoPendingAction);
        }
        return Ok(pages::optin_page(lang, subscriber.as_uuid(), &pending));
    }

    match consent::confirm_opt_in(stores.subscribers.as_ref(), subscriber, &lists).await? {
        ConfirmOutcome::Confirmed(_) => Ok(pages::message_page(
            StatusCode::OK,
            lang.t("public.subConfirmedTitle"),
            lang.t("public.subConfirmedInfo"),
        )),
        ConfirmOutcome::NoPendingConfirmation => Err(PublicError::NoPendingAction),
    }
}
