//! JSON web frontend for the derivation checker

use axum::{
    routing::{get, post},
    Json, Router,
};
use clap::Arg;
use fitch_common::{
    comment, die,
    derivation::{check_derivation, DerivationStyle},
    output::install_signal_handler,
    report::DerivationReport,
    write_to_stdout,
};
use serde_derive::Deserialize;

/// The request body accepted by `/check-proof`.
#[derive(Deserialize)]
struct CheckRequest {
    /// The derivation text, one inference per line
    #[serde(default)]
    proof: String,
    /// How to interpret the lines; sequent style when omitted
    #[serde(default)]
    style: Style,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
enum Style {
    Sequent,
    Fitch,
}

impl Default for Style {
    fn default() -> Style {
        Style::Sequent
    }
}

async fn index() -> &'static str {
    "fitch proof checker\n\
     POST /check-proof with a JSON body {\"proof\": \"...\", \"style\": \"sequent\"|\"fitch\"}\n"
}

/// Check a submitted derivation. Each request checks against its own
/// fresh sequent record; nothing is shared between submissions.
async fn check_proof(Json(request): Json<CheckRequest>) -> Json<DerivationReport> {
    if request.proof.trim().is_empty() {
        return Json(DerivationReport::rejected("Empty proof provided"));
    }
    let style = match request.style {
        Style::Sequent => DerivationStyle::Sequent,
        Style::Fitch => DerivationStyle::Fitch,
    };
    Json(check_derivation(&request.proof, style))
}

#[tokio::main]
async fn main() {
    install_signal_handler();
    let matches = clap::App::new("fitch-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .arg(
            Arg::with_name("LISTEN")
                .takes_value(true)
                .short("l")
                .long("listen")
                .default_value("127.0.0.1:8000")
                .help("Address to listen on."),
        )
        .get_matches();
    let address = matches.value_of("LISTEN").unwrap();

    let router = Router::new()
        .route("/", get(index))
        .route("/check-proof", post(check_proof));
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .unwrap_or_else(|err| die!("cannot listen on {}: {}", address, err));
    comment!("listening on {}", address);
    axum::serve(listener, router)
        .await
        .unwrap_or_else(|err| die!("server error: {}", err));
}
