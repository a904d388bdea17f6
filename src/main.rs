use clap::Parser;
use tracing::info;

#[tokio::main]
async fn main() {
    let args = pdfshelf::config::StartArgs::parse();
    let app = pdfshelf::app::state::AppState::new(&args).await;

    let addr = args.address();
    let origins = args.allowed_origins();
    let upload_limit = args.upload_limit();

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("error while starting TCP listener");

    let router = pdfshelf::app::server::router::router(app, origins, upload_limit);

    info!("Listening on {addr}");

    axum::serve(listener, router)
        .await
        .expect("error while starting server");
}
