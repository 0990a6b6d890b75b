use crate::{
    db::users::{NewUser, UserPatch, Users},
    libs::{config::Config, messages::Message, view::View},
    msg_bail_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Confirm, Password};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: UserCommand,
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    /// Register a new user
    Register {
        #[arg(long)]
        username: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
    },
    /// Show a user's profile
    Show { username: String },
    /// Change email or name
    Edit {
        username: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
    },
    /// Check a user's password
    Verify { username: String },
    /// Delete a user and all of their tasks
    Delete {
        username: String,
        /// Do not ask for confirmation
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: UserArgs, config: &Config) -> Result<()> {
    let mut users = Users::new(&config.database)?;

    match args.command {
        UserCommand::Register {
            username,
            email,
            first_name,
            last_name,
        } => {
            let password = Password::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPassword.to_string())
                .with_confirmation(Message::PromptPasswordConfirm.to_string(), Message::PasswordMismatch.to_string())
                .interact()?;

            let user = users.register(&NewUser {
                username,
                email,
                password,
                first_name,
                last_name,
            })?;
            msg_success!(Message::UserRegistered(user.username));
        }
        UserCommand::Show { username } => {
            let user = users.require(&username)?;
            msg_print!(Message::UserHeader(user.username.clone()), true);
            View::user(&user)?;
        }
        UserCommand::Edit {
            username,
            email,
            first_name,
            last_name,
        } => {
            let user = users.require(&username)?;
            let patch = UserPatch {
                email,
                first_name,
                last_name,
            };
            if patch.is_empty() {
                msg_info!(Message::NoChangesDetected);
                return Ok(());
            }
            users.update(user.id, &patch)?;
            msg_success!(Message::UserUpdated(username));
        }
        UserCommand::Verify { username } => {
            let password = Password::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPassword.to_string())
                .interact()?;

            match users.verify_password(&username, &password)? {
                Some(user) => msg_success!(Message::PasswordValid(user.first_name)),
                None => msg_bail_anyhow!(Message::PasswordInvalid),
            }
        }
        UserCommand::Delete { username, yes } => {
            let user = users.require(&username)?;

            let confirmed = yes
                || Confirm::with_theme(&ColorfulTheme::default())
                    .with_prompt(Message::ConfirmDeleteUser(username.clone()).to_string())
                    .default(false)
                    .interact()?;

            if !confirmed {
                msg_warning!(Message::OperationCancelled);
                return Ok(());
            }

            users.delete(user.id)?;
            msg_success!(Message::UserDeleted(username));
        }
    }

    Ok(())
}
