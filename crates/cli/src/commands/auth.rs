//! Account and session commands.

use classroom_client::api::NewUser;
use classroom_client::session::TokenClaims;
use classroom_client::{FileStore, Page, Portal};
use classroom_core::{Role, Session};
use secrecy::SecretString;

use crate::display;
use crate::error::CliError;

/// Register an account.
pub async fn signup(
    portal: &Portal<FileStore>,
    username: String,
    password: String,
    role: Role,
) -> Result<(), CliError> {
    let user = NewUser {
        username,
        password: SecretString::from(password),
        role,
    };
    let flash = portal.signup(&user).await?;
    display::flash(&flash);
    Ok(())
}

/// Log in and store the session.
pub async fn login(
    portal: &mut Portal<FileStore>,
    username: &str,
    password: String,
) -> Result<(), CliError> {
    let nav = portal
        .login(username, &SecretString::from(password))
        .await?;
    display::flash(&nav.flash);
    display::emit(next_step(nav.to));
    Ok(())
}

/// Clear the stored session.
pub fn logout(portal: &mut Portal<FileStore>) -> Result<(), CliError> {
    portal.logout()?;
    display::emit("Logged out.");
    Ok(())
}

/// Show the stored session.
pub fn whoami(portal: &Portal<FileStore>) {
    match portal.gate().current() {
        Some(session) => display::emit(&session_summary(&session)),
        None => display::emit("Not logged in."),
    }
}

fn session_summary(session: &Session) -> String {
    let mut out = format!("Logged in as {} ({})", session.subject, session.role);
    if let Some(expires) = TokenClaims::decode(session.token.as_str())
        .ok()
        .and_then(|claims| claims.expires_at())
    {
        out.push_str(&format!("\nToken expires: {}", expires.to_rfc3339()));
    }
    out
}

const fn next_step(page: Page) -> &'static str {
    match page {
        Page::Entry => "Run `classroom login` to continue.",
        Page::TeacherDashboard => "Next: `classroom teacher assignments`",
        Page::StudentDashboard => "Next: `classroom student assignments`",
    }
}
