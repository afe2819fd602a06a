//! # gsend
//!
//! Command line Gmail sender. Authorizes against Google with an OAuth2
//! loopback flow, then submits the message through either the Gmail REST
//! API or SMTP, optionally filing a copy into the sent folder over IMAP.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};
use gsend_core::{
    ClientSecrets, TokenProvider, TokenStore, send_via_api, send_via_smtp, send_via_smtp_with_copy,
};
use gsend_mime::{OutboundMessage, SenderMode};
use gsend_oauth::provider::{SCOPE_GMAIL_SEND, SCOPE_MAIL_FULL};
use gsend_oauth::{DEFAULT_PORT, LoopbackListener, Provider};
use gsend_transport::{GmailClient, SentMailbox, SmtpSender};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Send mail through Gmail from the command line.
#[derive(Parser)]
#[command(name = "gsend", version)]
struct Cli {
    /// Path to the OAuth client credentials JSON from the Google console
    #[arg(long, global = true, default_value = "credentials.json", value_name = "FILE")]
    credentials: PathBuf,

    /// Path for the cached token
    #[arg(long, global = true, default_value = "token.json", value_name = "FILE")]
    token_file: PathBuf,

    /// Loopback port for the OAuth redirect; must match the redirect URI
    /// registered with the provider
    #[arg(long, global = true, default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Seconds to wait for the browser authorization
    #[arg(long, global = true, default_value_t = 300, value_name = "SECONDS")]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Send through the Gmail REST API
    Api {
        #[command(flatten)]
        message: MessageArgs,
    },
    /// Send through SMTP submission on smtp.gmail.com
    Smtp {
        /// Gmail address to authenticate as
        #[arg(long, value_name = "ADDRESS")]
        user: String,

        /// Also file a copy into "[Gmail]/Sent Mail" over IMAP
        #[arg(long)]
        copy_to_sent: bool,

        #[command(flatten)]
        message: MessageArgs,
    },
}

/// Message content shared by both transports.
#[derive(Args)]
struct MessageArgs {
    /// Recipient address
    #[arg(long, value_name = "ADDRESS")]
    to: String,

    /// Subject line
    #[arg(long)]
    subject: String,

    /// Plain text body
    #[arg(long, default_value = "")]
    body: String,

    /// File to attach; repeat for multiple files. Missing files are skipped
    #[arg(long = "attach", value_name = "FILE")]
    attachments: Vec<PathBuf>,

    /// Primary account shown in From when sending on its behalf
    #[arg(long, value_name = "ADDRESS", requires = "send_as")]
    from: Option<String>,

    /// Identity to send as, either a delegate or a configured alias
    #[arg(long, value_name = "ADDRESS")]
    send_as: Option<String>,
}

impl MessageArgs {
    fn into_message(self) -> OutboundMessage {
        let sender = match (self.from, self.send_as) {
            (Some(primary), Some(send_as)) => SenderMode::OnBehalfOf { primary, send_as },
            (None, Some(send_as)) => SenderMode::AsIdentity { send_as },
            _ => SenderMode::AsSelf,
        };

        let mut message = OutboundMessage::new(self.to, self.subject)
            .with_body(self.body)
            .with_sender(sender);
        for path in self.attachments {
            message = message.with_attachment(path);
        }
        message
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            "gsend=info,gsend_core=info,gsend_oauth=info,gsend_transport=info".into()
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    let secrets = ClientSecrets::from_file(&cli.credentials).with_context(|| {
        format!(
            "failed to load OAuth client credentials from {}",
            cli.credentials.display()
        )
    })?;

    // The REST path only needs the send scope; SMTP and IMAP authenticate
    // with XOAUTH2, which Google only honors for the full mail scope.
    let scopes = match &cli.command {
        Commands::Api { .. } => vec![SCOPE_GMAIL_SEND.to_string()],
        Commands::Smtp { .. } => vec![SCOPE_MAIL_FULL.to_string()],
    };
    let tokens = TokenProvider::new(
        &secrets,
        Provider::google()?,
        scopes,
        TokenStore::new(&cli.token_file),
        LoopbackListener::new(cli.port),
    );
    let timeout = Duration::from_secs(cli.timeout);

    match cli.command {
        Commands::Api { message } => cmd_api(&tokens, &message.into_message(), timeout).await,
        Commands::Smtp {
            user,
            copy_to_sent,
            message,
        } => cmd_smtp(&tokens, &user, copy_to_sent, &message.into_message(), timeout).await,
    }
}

async fn cmd_api(
    tokens: &TokenProvider,
    message: &OutboundMessage,
    timeout: Duration,
) -> anyhow::Result<()> {
    let id = send_via_api(tokens, &GmailClient::new(), message, timeout).await?;
    println!("Sent message {id}");
    Ok(())
}

async fn cmd_smtp(
    tokens: &TokenProvider,
    user: &str,
    copy_to_sent: bool,
    message: &OutboundMessage,
    timeout: Duration,
) -> anyhow::Result<()> {
    let sender = SmtpSender::gmail();
    if copy_to_sent {
        let mailbox = SentMailbox::gmail();
        send_via_smtp_with_copy(tokens, &sender, &mailbox, user, message, timeout).await?;
    } else {
        send_via_smtp(tokens, &sender, user, message, timeout).await?;
    }
    println!("Sent message to {}", message.to);
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::redundant_clone, clippy::manual_string_new, clippy::needless_collect, clippy::unreadable_literal, clippy::used_underscore_items, clippy::similar_names)]
mod tests {
    use super::*;

    fn parse_message(extra: &[&str]) -> OutboundMessage {
        let mut argv = vec!["gsend", "api", "--to", "dest@example.com", "--subject", "Hi"];
        argv.extend_from_slice(extra);
        let cli = Cli::try_parse_from(argv).unwrap();
        match cli.command {
            Commands::Api { message } => message.into_message(),
            Commands::Smtp { .. } => unreachable!(),
        }
    }

    #[test]
    fn test_sender_defaults_to_self() {
        assert_eq!(parse_message(&[]).sender, SenderMode::AsSelf);
    }

    #[test]
    fn test_send_as_alone_is_identity() {
        let message = parse_message(&["--send-as", "alias@example.com"]);
        assert_eq!(
            message.sender,
            SenderMode::AsIdentity {
                send_as: "alias@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_from_with_send_as_is_delegated() {
        let message = parse_message(&[
            "--from",
            "primary@example.com",
            "--send-as",
            "delegate@example.com",
        ]);
        assert_eq!(
            message.sender,
            SenderMode::OnBehalfOf {
                primary: "primary@example.com".to_string(),
                send_as: "delegate@example.com".to_string(),
            }
        );
    }

    #[test]
    fn test_from_without_send_as_rejected() {
        let result = Cli::try_parse_from([
            "gsend",
            "api",
            "--to",
            "dest@example.com",
            "--subject",
            "Hi",
            "--from",
            "primary@example.com",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_repeated_attach_flags() {
        let message = parse_message(&["--attach", "a.pdf", "--attach", "b.png"]);
        assert_eq!(
            message.attachments,
            vec![PathBuf::from("a.pdf"), PathBuf::from("b.png")]
        );
    }
}
