use crate::domain::{NewSubscriber, SubscriberEmail, SubscriberName};
use crate::i18n::Lang;
use crate::models::ListVisibility;
use crate::privacy::PrivacyOptions;
use crate::routes::public::{pages, params};
use crate::stores::AppStores;
use crate::utils::PublicError;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, get, post, web};

/// The hosted signup form, listing only public lists. Disabled entirely
/// when the privacy configuration keeps the page private.
#[get("/subscription/form")]
#[tracing::instrument(name = "Subscription form page", skip(stores, privacy, lang))]
pub async fn get(
    stores: web::Data<AppStores>,
    privacy: web::Data<PrivacyOptions>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    match form_page(&stores, &privacy, &lang).await {
        Ok(response) => response,
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn form_page(
    stores: &AppStores,
    privacy: &PrivacyOptions,
    lang: &Lang,
) -> Result<HttpResponse, PublicError> {
    if !privacy.public_subscription_page {
        return Err(PublicError::FeatureDisabled);
    }

    let lists = stores.lists.lists(Some(ListVisibility::Public)).await?;
    if lists.is_empty() {
        return Ok(pages::message_page(
            StatusCode::OK,
            lang.t("public.subTitle"),
            lang.t("public.noListsAvailable"),
        ));
    }

    Ok(pages::subscription_form_page(lang, &lists))
}

#[post("/subscription/form")]
#[tracing::instrument(name = "Public subscription", skip(body, stores, privacy, lang))]
pub async fn post(
    body: String,
    stores: web::Data<AppStores>,
    privacy: web::Data<PrivacyOptions>,
    lang: web::Data<Lang>,
) -> HttpResponse {
    match subscribe(&stores, &privacy, &lang, &body).await {
        Ok(response) => response,
        Err(e) => pages::error_response(&lang, &e),
    }
}

async fn subscribe(
    stores: &AppStores,
    privacy: &PrivacyOptions,
    lang: &Lang,
    body: &str,
) -> Result<HttpResponse, PublicError> {
    if !privacy.public_subscription_page {
        return Err(PublicError::FeatureDisabled);
    }

    let pairs = params::parse_pairs(body)?;

    // Honeypot field. A filled nonce is a bot; reply with the same page a
    // misconfigured feature gets so there is nothing to learn from it.
    if params::value(&pairs, "nonce").is_some_and(|v| !crate::utils::is_empty_or_whitespace(v)) {
        return Ok(pages::message_page(
            StatusCode::OK,
            lang.t("public.errorTitle"),
            lang.t("public.invalidFeature"),
        ));
    }

    let lists = params::list_filter(&pairs)?;
    if lists.is_empty() {
        return Err(PublicError::InvalidInput(
            "no lists selected".to_string(),
        ));
    }

    let email = params::value(&pairs, "email").unwrap_or_default().to_string();
    let email = SubscriberEmail::parse(email).map_err(PublicError::InvalidInput)?;
    let name_raw = params::value(&pairs, "name").unwrap_or_default().trim();
    let name = if name_raw.is_empty() {
        // No name given; fall back to the e-mail's local part.
        SubscriberName::parse(email.local_part().to_string())
    } else {
        SubscriberName::parse(name_raw.to_string())
    }
    .map_err(PublicError::InvalidInput)?;

    let new_subscriber = NewSubscriber { email, name };
    let list_uuids: Vec<_> = lists.iter().map(|l| l.as_uuid()).collect();
    let created = stores
        .subscribers
        .create_subscriber(&new_subscriber, &list_uuids)
        .await?;

    let info = if created.has_pending_optin {
        lang.t("public.subOptinPending")
    } else {
        lang.t("public.subDone")
    };

    Ok(pages::message_page(
        StatusCode::OK,
        lang.t("public.subTitle"),
        info,
    ))
}
