//! Minimal page shells for the public endpoints.
//!
//! Every outcome, success or failure, is rendered through the same fixed
//! shell with localized strings. `InvalidInput` and `NotFound` share one
//! body so responses cannot be used to probe which identifiers exist.

use crate::i18n::Lang;
use crate::models::{List, ListRelation};
use crate::privacy::PrivacyOptions;
use crate::utils::PublicError;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use actix_web::http::header::ContentType;
use uuid::Uuid;

pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

fn shell(title: &str, body: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head><meta charset="utf-8"><meta name="viewport" content="width=device-width"><title>{title}</title></head>
<body><main><h1>{title}</h1>{body}</main></body>
</html>"#,
        title = escape_html(title),
        body = body
    )
}

pub fn message_page(status: StatusCode, title: &str, message: &str) -> HttpResponse {
    let body = format!("<p>{}</p>", escape_html(message));
    HttpResponse::build(status)
        .content_type(ContentType::html())
        .body(shell(title, &body))
}

pub fn not_found(lang: &Lang) -> HttpResponse {
    message_page(
        StatusCode::NOT_FOUND,
        lang.t("public.notFoundTitle"),
        lang.t("public.notFoundInfo"),
    )
}

/// One place maps the public error taxonomy onto pages and status codes.
pub fn error_response(lang: &Lang, error: &PublicError) -> HttpResponse {
    match error {
        // Deliberately indistinguishable.
        PublicError::InvalidInput(_) | PublicError::NotFound => not_found(lang),
        PublicError::FeatureDisabled => message_page(
            StatusCode::BAD_REQUEST,
            lang.t("public.errorTitle"),
            lang.t("public.invalidFeature"),
        ),
        PublicError::NoPendingAction => message_page(
            StatusCode::OK,
            lang.t("public.noSubTitle"),
            lang.t("public.noSubInfo"),
        ),
        PublicError::Internal(_) => {
            tracing::error!(error.cause_chain = ?error, "request failed");
            message_page(
                StatusCode::INTERNAL_SERVER_ERROR,
                lang.t("public.errorTitle"),
                lang.t("public.errorProcessingRequest"),
            )
        }
    }
}

/// The subscription-management page: unsubscribe form plus, depending on
/// the privacy gates, the blocklist checkbox and the export/wipe actions.
pub fn unsubscribe_page(
    lang: &Lang,
    privacy: &PrivacyOptions,
    campaign_uuid: Uuid,
    subscriber_uuid: Uuid,
) -> HttpResponse {
    let mut body = format!(
        r#"<form method="post" action="/subscription/{campaign_uuid}/{subscriber_uuid}">
<p>{info}</p>
"#,
        info = escape_html(lang.t("public.unsubscribeInfo")),
    );
    if privacy.allow_blocklist {
        body.push_str(&format!(
            r#"<label><input type="checkbox" name="blocklist" value="true"> {}</label>
"#,
            escape_html(lang.t("public.unsubscribeBlocklist"))
        ));
    }
    body.push_str("<button type=\"submit\">Unsubscribe</button>\n</form>\n");

    if privacy.allow_export {
        body.push_str(&format!(
            r#"<form method="post" action="/subscription/export/{subscriber_uuid}"><button type="submit">Export my data</button></form>
"#
        ));
    }
    if privacy.allow_wipe {
        body.push_str(&format!(
            r#"<form method="post" action="/subscription/wipe/{subscriber_uuid}"><button type="submit">Delete my data</button></form>
"#
        ));
    }

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(shell(lang.t("public.unsubscribeTitle"), &body))
}

/// The double opt-in page listing the pending lists, with a confirm form
/// that replays the targeted list set.
pub fn optin_page(lang: &Lang, subscriber_uuid: Uuid, pending: &[ListRelation]) -> HttpResponse {
    let mut body = format!(
        "<p>{}</p>\n<ul>\n",
        escape_html(lang.t("public.confirmOptinInfo"))
    );
    for relation in pending {
        body.push_str(&format!(
            "<li>{}</li>\n",
            escape_html(&relation.list_name)
        ));
    }
    body.push_str("</ul>\n");

    body.push_str(&format!(
        r#"<form method="post" action="/subscription/optin/{subscriber_uuid}">
<input type="hidden" name="confirm" value="true">
"#
    ));
    for relation in pending {
        body.push_str(&format!(
            r#"<input type="hidden" name="l" value="{}">
"#,
            relation.list_uuid
        ));
    }
    body.push_str("<button type=\"submit\">Confirm</button>\n</form>\n");

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(shell(lang.t("public.confirmOptinTitle"), &body))
}

/// The public signup form. The `nonce` input is a honeypot: humans leave it
/// empty, naive bots fill it.
pub fn subscription_form_page(lang: &Lang, lists: &[List]) -> HttpResponse {
    let mut body = format!(
        r#"<p>{info}</p>
<form method="post" action="/subscription/form">
<input type="email" name="email" placeholder="E-mail" required>
<input type="text" name="name" placeholder="Name (optional)">
<input type="text" name="nonce" value="" style="display:none" tabindex="-1" autocomplete="off">
"#,
        info = escape_html(lang.t("public.subInfo")),
    );
    for list in lists {
        body.push_str(&format!(
            r#"<label><input type="checkbox" name="l" value="{}"> {}</label>
"#,
            list.uuid,
            escape_html(&list.name)
        ));
    }
    body.push_str("<button type=\"submit\">Subscribe</button>\n</form>\n");

    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(shell(lang.t("public.subTitle"), &body))
}
