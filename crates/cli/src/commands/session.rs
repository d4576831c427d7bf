use anyhow::Result;
use billed_core::BilledError;
use billed_types::output::SessionOutput;
use billed_types::session::{UserSession, UserType};
use billed_utils::output::{render, OutputFormat};

/// `billed session set`: store who is connected.
pub fn set(email: &str, user_type: &str, jwt: Option<String>, fmt: OutputFormat) -> Result<()> {
    let user_type: UserType = user_type.parse().map_err(BilledError::InvalidSession)?;
    if email.trim().is_empty() {
        return Err(BilledError::InvalidSession("email is empty".into()).into());
    }

    let session = UserSession {
        user_type,
        email: email.trim().to_string(),
        jwt,
    };
    billed_core::workspace::save_session(&session)?;
    tracing::info!(email = %session.email, "session stored");

    render(fmt, &to_output(Some(&session)))
}

/// `billed session show`
pub fn show(fmt: OutputFormat) -> Result<()> {
    let session = billed_core::workspace::load_session()?;
    render(fmt, &to_output(session.as_ref()))
}

/// `billed session clear`
pub fn clear() -> Result<()> {
    if billed_core::workspace::clear_session()? {
        println!("✓ Session cleared.");
    } else {
        println!("No session stored.");
    }
    Ok(())
}

fn to_output(session: Option<&UserSession>) -> SessionOutput {
    SessionOutput {
        connected: session.is_some(),
        user_type: session.map(|s| s.user_type.to_string()),
        email: session.map(|s| s.email.clone()),
        has_token: session.is_some_and(|s| s.jwt.is_some()),
    }
}
