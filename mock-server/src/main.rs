use log::LevelFilter;
use simplelog::{ConfigBuilder, SimpleLogger};
use tokio::net::TcpListener;

fn setup_logger() {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .add_filter_allow_str("mock_server")
        .build();
    // A second logger only happens when embedded; keep serving either way.
    let _ = SimpleLogger::init(LevelFilter::Info, config);
}

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    setup_logger();
    let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    log::info!("mock wallet API listening on {addr}");
    mock_server::run(listener).await
}
