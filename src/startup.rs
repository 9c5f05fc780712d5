use crate::configuration::{DatabaseSettings, Settings};
use crate::email_client::EmailClient;
use crate::i18n::Lang;
use crate::privacy::PrivacyOptions;
use crate::routes::{health_check, public};
use crate::stores::{AppStores, PgStore};
use actix_web::dev::Server;
use actix_web::web::Data;
use actix_web::{App, HttpServer};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;
use tracing_actix_web::TracingLogger;

pub struct Application {
    port: u16,
    server: Server,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let store = Arc::new(PgStore::new(connection_pool));
        let stores = AppStores {
            subscribers: store.clone(),
            campaigns: store.clone(),
            lists: store,
        };
        let email_client = configuration.email_client.client();
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address)?;
        let port = listener.local_addr()?.port();
        let server = run(
            listener,
            stores,
            email_client,
            configuration.privacy,
            Lang::load_default(),
            configuration.application.base_url,
        )
        .await?;

        Ok(Self { port, server })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        self.server.await
    }
}

pub fn get_connection_pool(configuration: &DatabaseSettings) -> PgPool {
    PgPoolOptions::new().connect_lazy_with(configuration.connect_options())
}

pub async fn run(
    listener: TcpListener,
    stores: AppStores,
    email_client: EmailClient,
    privacy: PrivacyOptions,
    lang: Lang,
    base_url: String,
) -> Result<Server, anyhow::Error> {
    let stores = Data::new(stores);
    let email_client = Data::new(email_client);
    let privacy = Data::new(privacy);
    let lang = Data::new(lang);
    let base_url = Data::new(ApplicationBaseUrl(base_url));

    let server = HttpServer::new(move || {
        App::new()
            .wrap(TracingLogger::default())
            .service(health_check::get)
            .service(public::form::get)
            .service(public::form::post)
            // The literal /subscription/... routes must come before the
            // {campaign_uuid}/{subscriber_uuid} pair or they never match.
            .service(public::optin::get)
            .service(public::optin::post)
            .service(public::export::post)
            .service(public::wipe::post)
            .service(public::subscription::get)
            .service(public::subscription::post)
            .service(public::track::get)
            .service(public::message::get)
            .service(public::track::link)
            .app_data(stores.clone())
            .app_data(email_client.clone())
            .app_data(privacy.clone())
            .app_data(lang.clone())
            .app_data(base_url.clone())
    })
    .listen(listener)?
    .run();
    Ok(server)
}

pub struct ApplicationBaseUrl(pub String);
