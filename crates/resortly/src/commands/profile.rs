//! Profile command handlers.

use secrecy::SecretString;

use resortly_core::{Profile, UpdatePassword, UpdateProfile};

use crate::cli::{GlobalOpts, ProfileArgs, ProfileCommand};
use crate::error::CliError;
use crate::output;

use super::{Ctx, util};

fn detail(p: &Profile) -> String {
    let mut lines = vec![
        format!("Nama akun: {}", p.user.name),
        format!("Email:     {}", p.user.email),
    ];
    if let Some(ref c) = p.pelanggan {
        lines.push(format!("Pelanggan: {}", c.nm_pelanggan));
        lines.push(format!("No HP:     {}", util::or_dash(c.no_hp.as_deref())));
        lines.push(format!("Alamat:    {}", util::or_dash(c.alamat.as_deref())));
        lines.push(format!("Foto:      {}", util::or_dash(c.foto_pelanggan.as_deref())));
    }
    lines.join("\n")
}

fn print_profile(profile: &Profile, global: &GlobalOpts) {
    let out = output::render_single(&global.output, profile, detail, |p| p.user.email.clone());
    output::print_output(&out, global.quiet);
}

fn prompt_secret(prompt: &str) -> Result<SecretString, CliError> {
    Ok(SecretString::from(rpassword::prompt_password(prompt)?))
}

pub async fn handle(ctx: &Ctx, args: ProfileArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let store = ctx.resort.profile();
    match args.command {
        ProfileCommand::Show => {
            let profile = store.fetch_profile().await?;
            print_profile(&profile, global);
            Ok(())
        }

        ProfileCommand::Update {
            name,
            email,
            customer_name,
            phone,
            address,
        } => {
            // The endpoint replaces every field, so start from the current values.
            let current = store.fetch_profile().await?;
            let customer = current.pelanggan.as_ref();
            let data = UpdateProfile {
                name: name.unwrap_or_else(|| current.user.name.clone()),
                email: email.unwrap_or_else(|| current.user.email.clone()),
                nm_pelanggan: customer_name.unwrap_or_else(|| {
                    customer.map_or_else(|| current.user.name.clone(), |c| c.nm_pelanggan.clone())
                }),
                no_hp: phone
                    .or_else(|| customer.and_then(|c| c.no_hp.clone()))
                    .unwrap_or_default(),
                alamat: address
                    .or_else(|| customer.and_then(|c| c.alamat.clone()))
                    .unwrap_or_default(),
            };
            let profile = store.update_profile(&data).await?;
            util::done("Profil diperbarui", global);
            print_profile(&profile, global);
            Ok(())
        }

        ProfileCommand::Password => {
            let data = UpdatePassword {
                current_password: prompt_secret("Password saat ini: ")?,
                password: prompt_secret("Password baru: ")?,
                password_confirmation: prompt_secret("Ulangi password baru: ")?,
            };
            store.update_password(&data).await?;
            util::done("Password diperbarui", global);
            Ok(())
        }

        ProfileCommand::Photo { path } => {
            let stored = store.upload_photo(&path).await?;
            util::done("Foto profil diperbarui", global);
            output::print_output(&stored, global.quiet);
            Ok(())
        }
    }
}
