use daybook_core::auth::SignUpOutcome;
use daybook_core::store::{ProfileStore, SupabaseRestClient};

use crate::auth::{clear_stored_session, load_stored_session};
use crate::cli::AuthCommands;
use crate::commands::common::{open_session_provider, resolve_profile_config};
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Signup {
            email,
            password,
            name,
        } => {
            let (profile_name, _, mut provider) = open_session_provider(profile).await?;
            match provider.sign_up(&email, &password, &name).await? {
                SignUpOutcome::SignedIn(session) => {
                    let email_label = session.user.email.as_deref().unwrap_or("(no email)");
                    println!(
                        "Account created. Profile '{profile_name}' signed in as {email_label}"
                    );
                }
                SignUpOutcome::ConfirmationRequired => {
                    println!(
                        "Account created. Check {email} for a confirmation link, then run `daybook auth login`."
                    );
                }
            }
            Ok(())
        }
        AuthCommands::Login { email, password } => {
            let (profile_name, _, mut provider) = open_session_provider(profile).await?;
            let user = provider.sign_in(&email, &password).await?;
            let email_label = user.email.as_deref().unwrap_or("(no email)");
            println!("Signed in profile '{profile_name}' as {email_label}");
            Ok(())
        }
        AuthCommands::Status => {
            let (profile_name, config, mut provider) = match open_session_provider(profile).await {
                Ok(opened) => opened,
                Err(CliError::NotConfigured(profile_name)) => {
                    println!("Profile '{profile_name}' is not configured.");
                    return Ok(());
                }
                Err(error) => return Err(error),
            };

            provider.initialize().await?;
            let Some(session) = provider.session() else {
                println!("Profile '{profile_name}' is not signed in.");
                return Ok(());
            };

            let email_label = session.user.email.as_deref().unwrap_or("(no email)");
            println!(
                "Profile '{}' is signed in as {} (expires_at={})",
                profile_name, email_label, session.expires_at
            );

            if let Some((url, anon_key)) = config.supabase_endpoint() {
                let profiles =
                    SupabaseRestClient::new(url, anon_key, session.access_token.clone())?;
                match profiles.get_profile(&session.user.id).await {
                    Ok(Some(user_profile)) => println!("Name: {}", user_profile.name),
                    Ok(None) => {}
                    Err(error) => tracing::warn!("Failed to load profile: {}", error),
                }
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let (profile_name, _) = resolve_profile_config(profile).await?;

            match open_session_provider(profile).await {
                Ok((_, _, mut provider)) => {
                    if load_stored_session(&profile_name)?.is_some() {
                        provider.initialize().await?;
                    }
                    provider.sign_out().await?;
                }
                Err(CliError::NotConfigured(_)) => clear_stored_session(&profile_name)?,
                Err(error) => return Err(error),
            }

            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}
