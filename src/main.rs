use bearychat::{Client, Message, WebhookError};
use clap::{Args, Parser, Subcommand};
use std::process::ExitCode;
use tracing::info;

#[derive(Parser)]
#[command(name = "bearychat")]
#[command(about = "Send messages to a BearyChat incoming webhook")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Post a message to the webhook from BEARYCHAT_WEBHOOK
    Send(MessageArgs),
    /// Print the message JSON without sending it
    Render(MessageArgs),
}

#[derive(Args)]
struct MessageArgs {
    /// Message text
    text: String,
    /// `@user`, `#channel` or a bare channel name
    #[arg(long)]
    to: Option<String>,
    #[arg(long)]
    notification: Option<String>,
    /// Send the text as plain text instead of markdown
    #[arg(long)]
    no_markdown: bool,
    /// Attachment text, may be repeated
    #[arg(long = "attachment")]
    attachments: Vec<String>,
    /// Image URL added as its own attachment
    #[arg(long)]
    image: Option<String>,
}

impl MessageArgs {
    fn apply(&self, message: &mut Message) {
        message.set_text(&self.text);
        if let Some(target) = &self.to {
            message.to(target);
        }
        if let Some(notification) = &self.notification {
            message.set_notification(notification);
        }
        if self.no_markdown {
            message.disable_markdown();
        }
        for attachment in &self.attachments {
            message.add(attachment);
        }
        if let Some(image) = &self.image {
            message.add_image(image.as_str(), None);
        }
    }
}

async fn run(cli: Cli) -> Result<(), WebhookError> {
    match cli.command {
        Commands::Send(args) => {
            let client = Client::from_env()?;
            let mut message = client.create_message();
            args.apply(&mut message);

            if !message.send().await? {
                return Err(WebhookError::new("webhook_rejected")
                    .push_str(format!("POST {} did not answer 200", client.webhook())));
            }
            info!(recipient = ?message.target(), "message sent");
        }
        Commands::Render(args) => {
            let mut message = Message::new();
            args.apply(&mut message);
            println!("{}", message.to_json()?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            e.print_tree();
            ExitCode::FAILURE
        }
    }
}
