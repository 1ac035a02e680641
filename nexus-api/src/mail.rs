/// Invitation email dispatch
///
/// Sends the acceptance link for a team invitation over SMTP. Dispatch is
/// strictly best-effort: when credentials are not configured the send is
/// skipped and logged, and transport failures are logged without surfacing
/// to the caller. Invitation creation never depends on mail availability.
///
/// # Example
///
/// ```no_run
/// use nexus_api::config::MailConfig;
/// use nexus_api::mail::Mailer;
///
/// # async fn example(config: MailConfig) {
/// let mailer = Mailer::from_config(&config);
/// mailer.send_invitation("new@example.com", "deadbeef").await;
/// # }
/// ```

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use tracing::{info, warn};

use crate::config::MailConfig;

/// Best-effort SMTP mailer
///
/// Holds no transport when credentials are absent; every send then degrades
/// to a log line.
#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Option<Mailbox>,
    base_url: String,
}

impl Mailer {
    /// Builds a mailer from configuration
    ///
    /// A misconfigured relay host or unparseable from-address downgrades to
    /// the unconfigured state rather than failing startup.
    pub fn from_config(config: &MailConfig) -> Self {
        let base_url = config.base_url.clone();

        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            info!("Mail credentials not configured; invitation emails will be skipped");
            return Self {
                transport: None,
                from: None,
                base_url,
            };
        };

        let from = match format!("Nexus Team <{}>", username).parse::<Mailbox>() {
            Ok(from) => from,
            Err(e) => {
                warn!("Invalid mail from-address {:?}: {}", username, e);
                return Self {
                    transport: None,
                    from: None,
                    base_url,
                };
            }
        };

        let transport = match AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host) {
            Ok(builder) => Some(
                builder
                    .credentials(Credentials::new(username.clone(), password.clone()))
                    .build(),
            ),
            Err(e) => {
                warn!("Invalid SMTP relay host {:?}: {}", config.smtp_host, e);
                None
            }
        };

        Self {
            transport,
            from: Some(from),
            base_url,
        }
    }

    /// Whether a transport is available
    pub fn is_configured(&self) -> bool {
        self.transport.is_some()
    }

    /// The acceptance link embedded into invitation emails
    pub fn invite_link(&self, token: &str) -> String {
        format!("{}/register?token={}", self.base_url, token)
    }

    /// Sends an invitation email
    ///
    /// Never fails: unconfigured transport, bad recipient address, and SMTP
    /// errors are all logged and swallowed.
    pub async fn send_invitation(&self, email: &str, token: &str) {
        let (Some(transport), Some(from)) = (&self.transport, &self.from) else {
            info!(
                "Email skipped for {} (configure EMAIL_USER / EMAIL_PASS to send invitations)",
                email
            );
            return;
        };

        let to = match email.parse::<Mailbox>() {
            Ok(to) => to,
            Err(e) => {
                warn!("Invalid invitation recipient {:?}: {}", email, e);
                return;
            }
        };

        let invite_link = self.invite_link(token);
        let body = invitation_body(&invite_link);

        let message = Message::builder()
            .from(from.clone())
            .to(to)
            .subject("Join the Team on Nexus")
            .header(ContentType::TEXT_HTML)
            .body(body);

        let message = match message {
            Ok(message) => message,
            Err(e) => {
                warn!("Failed to build invitation email for {}: {}", email, e);
                return;
            }
        };

        match transport.send(message).await {
            Ok(_) => info!("Invitation email sent to {}", email),
            Err(e) => warn!("Failed to send invitation email to {}: {}", email, e),
        }
    }
}

/// Renders the invitation email body
fn invitation_body(invite_link: &str) -> String {
    format!(
        r#"<div style="background-color: #0B0B0B; color: #E5E5E5; padding: 40px; font-family: sans-serif; border-radius: 8px;">
    <h1 style="color: #FFFFFF; letter-spacing: -1px; margin-bottom: 24px;">Nexus</h1>
    <p style="font-size: 16px; margin-bottom: 32px; color: #A3A3A3;">
        You have been invited to collaborate on Nexus. Join the workspace to start tracking tasks and projects.
    </p>
    <a href="{invite_link}" style="background-color: #FFFFFF; color: #000000; padding: 12px 24px; text-decoration: none; border-radius: 4px; font-weight: bold; font-size: 14px;">
        Join Nexus Team
    </a>
    <p style="margin-top: 40px; font-size: 12px; color: #525252;">
        If you didn't expect this invitation, you can ignore this email.
    </p>
</div>"#
    )
}
