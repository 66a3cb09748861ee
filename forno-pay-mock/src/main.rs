//! Payment processor stand-in
//!
//! Builds webhook events the way the processor does, signs them with the
//! shared secret (or attaches the static token) and delivers them to a
//! running forno-server.

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use shared::payment::{SIGNATURE_HEADER, TOKEN_HEADER, WebhookPayload, sign};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical message and its HMAC signature
    Sign(EventArgs),
    /// Deliver one event and print the server reply
    Send(DeliveryArgs),
    /// Deliver the same event twice; the second reply should be a duplicate
    Replay(DeliveryArgs),
}

#[derive(Args, Debug)]
struct EventArgs {
    /// Order intent id
    #[arg(long)]
    intent: String,
    /// Processor status (approved, declined, pending...)
    #[arg(long, default_value = "approved")]
    status: String,
    /// Amount in cents
    #[arg(long)]
    amount: i64,
    /// Transaction id; generated from the clock when omitted
    #[arg(long)]
    txid: Option<String>,
    /// Unix seconds; defaults to now
    #[arg(long)]
    ts: Option<i64>,
    #[arg(long, env = "WEBHOOK_SECRET", hide_env_values = true)]
    secret: Option<String>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Auth {
    Hmac,
    Token,
}

#[derive(Args, Debug)]
struct DeliveryArgs {
    #[command(flatten)]
    event: EventArgs,
    #[arg(long, env = "FORNO_URL", default_value = "http://localhost:8080")]
    url: String,
    #[arg(long, value_enum, default_value_t = Auth::Hmac)]
    auth: Auth,
    #[arg(long, env = "WEBHOOK_TOKEN", hide_env_values = true)]
    token: Option<String>,
}

impl EventArgs {
    fn payload(&self) -> WebhookPayload {
        let now = chrono::Utc::now();
        WebhookPayload {
            order: self.intent.clone(),
            status: self.status.clone(),
            amount: self.amount,
            txid: self
                .txid
                .clone()
                .unwrap_or_else(|| format!("mock-{}", now.timestamp_millis())),
            ts: self.ts.unwrap_or_else(|| now.timestamp()),
        }
    }

    fn signature(&self, payload: &WebhookPayload) -> Result<String> {
        let secret = self
            .secret
            .as_deref()
            .context("--secret or WEBHOOK_SECRET is required to sign")?;
        Ok(sign(secret, payload)?)
    }
}

struct Delivery {
    endpoint: String,
    header: (&'static str, String),
    payload: WebhookPayload,
}

impl DeliveryArgs {
    fn prepare(&self) -> Result<Delivery> {
        let payload = self.event.payload();
        let header = match self.auth {
            Auth::Hmac => (SIGNATURE_HEADER, self.event.signature(&payload)?),
            Auth::Token => match self.token.as_deref() {
                Some(token) if !token.is_empty() => (TOKEN_HEADER, token.to_string()),
                _ => bail!("--token or WEBHOOK_TOKEN is required with --auth token"),
            },
        };
        Ok(Delivery {
            endpoint: format!("{}/api/webhooks/payment", self.url.trim_end_matches('/')),
            header,
            payload,
        })
    }
}

async fn deliver(client: &reqwest::Client, delivery: &Delivery) -> Result<()> {
    tracing::info!(
        endpoint = %delivery.endpoint,
        intent = %delivery.payload.order,
        txid = %delivery.payload.txid,
        status = %delivery.payload.status,
        "Delivering webhook"
    );
    let response = client
        .post(&delivery.endpoint)
        .header(delivery.header.0, &delivery.header.1)
        .json(&delivery.payload)
        .send()
        .await
        .with_context(|| format!("POST {}", delivery.endpoint))?;

    let status = response.status();
    let body = response.text().await.context("reading response body")?;
    let pretty = serde_json::from_str::<serde_json::Value>(&body)
        .and_then(|v| serde_json::to_string_pretty(&v))
        .unwrap_or(body);
    println!("{status}\n{pretty}");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "forno_pay_mock=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Sign(event) => {
            let payload = event.payload();
            println!("message:   {}", payload.canonical_message());
            println!("signature: {}", event.signature(&payload)?);
            println!("{}", serde_json::to_string_pretty(&payload)?);
        }
        Command::Send(args) => {
            let delivery = args.prepare()?;
            deliver(&reqwest::Client::new(), &delivery).await?;
        }
        Command::Replay(args) => {
            let delivery = args.prepare()?;
            let client = reqwest::Client::new();
            deliver(&client, &delivery).await?;
            deliver(&client, &delivery).await?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use shared::payment::verify_signature;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn signs_what_the_server_verifies() {
        let cli = Cli::try_parse_from([
            "forno-pay-mock",
            "sign",
            "--intent",
            "abc",
            "--amount",
            "5690",
            "--txid",
            "tx-1",
            "--ts",
            "1700000000",
            "--secret",
            "s3cret",
        ])
        .unwrap();
        let Command::Sign(event) = cli.command else {
            panic!("expected sign");
        };
        let payload = event.payload();
        assert_eq!(payload.canonical_message(), "abc|approved|5690|tx-1|1700000000");
        let sig = event.signature(&payload).unwrap();
        assert!(verify_signature("s3cret", &payload, &sig, 1_700_000_000, 300).is_ok());
    }

    #[test]
    fn token_auth_requires_a_token() {
        let cli = Cli::try_parse_from([
            "forno-pay-mock",
            "send",
            "--intent",
            "abc",
            "--amount",
            "1",
            "--auth",
            "token",
        ])
        .unwrap();
        let Command::Send(mut args) = cli.command else {
            panic!("expected send");
        };
        args.token = None;
        assert!(args.prepare().is_err());
        args.token = Some("t".into());
        let delivery = args.prepare().unwrap();
        assert_eq!(delivery.header.0, TOKEN_HEADER);
        assert!(delivery.endpoint.ends_with("/api/webhooks/payment"));
    }
}
