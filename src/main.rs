use axum_server::tls_rustls::RustlsConfig;
use clap::Parser;
use std::net::{IpAddr, SocketAddr};

mod app;
mod error;
mod models;
mod routes;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    port: u16,

    /// PEM private key, serve over TLS when given
    #[arg(short, long, requires = "cert_file_path")]
    key_file_path: Option<String>,

    /// PEM certificate chain matching the key
    #[arg(short, long, requires = "key_file_path")]
    cert_file_path: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let args = Args::parse();
    let addr = SocketAddr::new(args.host, args.port);
    let app = app::create_app();

    log::info!("listening on {}", addr);
    if let (Some(key_file_path), Some(cert_file_path)) = (args.key_file_path, args.cert_file_path)
    {
        log::info!(
            "using tls with key file {} and cert file {}",
            key_file_path,
            cert_file_path
        );
        let tls = RustlsConfig::from_pem_file(cert_file_path, key_file_path).await?;
        axum_server::bind_rustls(addr, tls)
            .serve(app.into_make_service())
            .await
    } else {
        axum_server::bind(addr)
            .serve(app.into_make_service())
            .await
    }
}
