//! Login, logout and account info.

use secrecy::SecretString;

use resortly_config::ConfigError;

use crate::cli::{AuthArgs, AuthCommand, GlobalOpts};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

/// Password for a login: configured sources first, then a prompt.
fn password(ctx: &Ctx) -> Result<SecretString, CliError> {
    match config::resolve_password(&ctx.profile, &ctx.profile_name) {
        Ok(pw) => Ok(pw),
        Err(ConfigError::NoCredentials { .. }) => {
            let pw = rpassword::prompt_password("Password: ")?;
            Ok(SecretString::from(pw))
        }
        Err(e) => Err(e.into()),
    }
}

pub async fn handle(ctx: &Ctx, args: AuthArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let auth = ctx.resort.auth();
    match args.command {
        AuthCommand::Login { email, remember } => {
            let email = email
                .or_else(|| ctx.profile.email.clone())
                .ok_or_else(|| CliError::Validation {
                    field: "email".into(),
                    reason: "pass --email or set one with: resortly config set email <EMAIL>"
                        .into(),
                })?;
            let password = password(ctx)?;

            let user = auth.login(&email, &password).await?;
            if remember {
                resortly_config::store_password(&ctx.profile_name, &password)?;
            }
            util::done(&format!("Masuk sebagai {} ({})", user.name, user.email), global);
            Ok(())
        }

        AuthCommand::Logout => {
            ctx.resort.logout().await;
            util::done("Anda telah keluar", global);
            Ok(())
        }

        AuthCommand::Whoami => {
            if !auth.check_auth().await {
                return Err(resortly_core::StoreError::AuthRequired.into());
            }
            let Some(user) = auth.user() else {
                return Err(resortly_core::StoreError::AuthRequired.into());
            };
            let out = output::render_single(
                &global.output,
                &user,
                |u| {
                    [
                        format!("ID:     {}", u.id),
                        format!("Nama:   {}", u.name),
                        format!("Email:  {}", u.email),
                        format!("Role:   {}", u.role),
                    ]
                    .join("\n")
                },
                |u| u.email.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
