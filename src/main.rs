use std::{net::SocketAddr, sync::Arc};

use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderValue, Method};
use axum::{
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use reqwest::Client;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use intake_backend::config::Config;
use intake_backend::responses::JsonResponse;
use intake_backend::routes::contact::handle_contact;
use intake_backend::services::mailer::{Mailer, PluggableMailer};
use intake_backend::services::sheets::{GoogleSheetsSink, SheetsSink};
use intake_backend::state::AppState;

#[tokio::main]
async fn main() {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).unwrap();

    let config = Arc::new(Config::from_env());
    let http_client = Client::new();

    let mailer = Arc::new(
        PluggableMailer::from_env(&http_client).expect("Failed to initialize mailer"),
    ) as Arc<dyn Mailer>;

    let sheets = GoogleSheetsSink::from_env(&http_client)
        .expect("Failed to initialize sheets sink")
        .map(|sink| Arc::new(sink) as Arc<dyn SheetsSink>);
    match &sheets {
        Some(_) => info!("sheets sink enabled"),
        None => info!("sheets sink not configured; submissions go to email only"),
    }

    let state = AppState {
        mailer,
        sheets,
        config: config.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(config.frontend_origin.parse::<HeaderValue>().unwrap())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([CONTENT_TYPE]);

    let app = Router::new()
        .route("/", get(root))
        .route("/api/contact", post(handle_contact))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    let addr = SocketAddr::from(([127, 0, 0, 1], 3000));
    let listener = TcpListener::bind(addr).await.unwrap();
    println!("Running at http://{}", addr);
    axum::serve(listener, app).await.unwrap();
}

/// A simple root route.
async fn root() -> Response {
    JsonResponse::success("Hello, intake backend!").into_response()
}
