//! CLI configuration module

use clap::{Args, Parser, Subcommand};

use crate::config::{logging::LoggingConfig, session::SessionArgs, storefront::StorefrontArgs};

pub(crate) mod logging;
pub(crate) mod session;
pub(crate) mod storefront;

/// Loza cart session CLI
#[derive(Debug, Parser)]
#[command(name = "loza", about = "Loza cart CLI", long_about = None)]
pub(crate) struct CliConfig {
    #[command(subcommand)]
    pub command: Commands,

    /// Storefront API settings.
    #[command(flatten)]
    pub storefront: StorefrontArgs,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,

    /// Session persistence and display settings.
    #[command(flatten)]
    pub session: SessionArgs,
}

impl CliConfig {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        // Load .env file if present (ignore if missing)
        _ = dotenvy::dotenv();

        Self::try_parse()
    }
}

#[derive(Debug, Subcommand)]
pub(crate) enum Commands {
    Cart(CartCommand),
    Customer(CustomerCommand),
}

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    pub command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CartSubcommand {
    /// Show the current cart
    Show,

    /// Add merchandise to the cart
    Add {
        /// Product variant id, e.g. `gid://shopify/ProductVariant/1`
        merchandise_id: String,

        /// Quantity to add
        #[arg(short, long, default_value_t = 1)]
        quantity: u32,
    },

    /// Set a line's quantity; 0 removes the line
    Update {
        /// Cart line id
        line_id: String,

        /// New quantity
        quantity: u32,
    },

    /// Remove a line from the cart
    Remove {
        /// Cart line id
        line_id: String,
    },

    /// Print the localized checkout URL
    Checkout {
        /// Accept the terms and conditions
        #[arg(long)]
        accept_terms: bool,
    },

    /// Forget the stored cart
    Forget,
}

#[derive(Debug, Args)]
pub(crate) struct CustomerCommand {
    #[command(subcommand)]
    pub command: CustomerSubcommand,
}

#[derive(Debug, Subcommand)]
pub(crate) enum CustomerSubcommand {
    /// Show the signed-in customer
    Show,

    /// Sign in with email and password
    Login {
        /// Account email
        email: String,

        /// Account password
        #[arg(long, env = "LOZA_CUSTOMER_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Sign out and revoke the stored token
    Logout,
}

#[cfg(test)]
mod tests {
    use loza::i18n::Locale;
    use testresult::TestResult;

    use super::*;

    const REQUIRED: [&str; 5] = [
        "loza",
        "--store-domain",
        "loza.myshopify.com",
        "--access-token",
        "token",
    ];

    #[test]
    fn add_defaults_to_quantity_one() -> TestResult {
        let config = CliConfig::try_parse_from(REQUIRED.into_iter().chain(["cart", "add", "gid://shopify/ProductVariant/1"]))?;

        assert!(matches!(
            config.command,
            Commands::Cart(CartCommand {
                command: CartSubcommand::Add { quantity: 1, .. }
            })
        ));
        assert_eq!(config.storefront.api_version, "2024-01");

        Ok(())
    }

    #[test]
    fn locale_is_parsed() -> TestResult {
        let config = CliConfig::try_parse_from(REQUIRED.into_iter().chain(["--locale", "ar", "cart", "show"]))?;

        assert_eq!(config.session.locale, Locale::Ar);

        Ok(())
    }

    #[test]
    fn login_takes_password_flag() -> TestResult {
        let config = CliConfig::try_parse_from(REQUIRED.into_iter().chain([
            "customer",
            "login",
            "noa@example.com",
            "--password",
            "hunter2",
        ]))?;

        match config.command {
            Commands::Customer(CustomerCommand {
                command: CustomerSubcommand::Login { email, password },
            }) => {
                assert_eq!(email, "noa@example.com");
                assert_eq!(password, "hunter2");
            }
            other => panic!("expected customer login, got {other:?}"),
        }

        Ok(())
    }

    #[test]
    fn unknown_locale_is_rejected() {
        let result = CliConfig::try_parse_from(REQUIRED.into_iter().chain(["--locale", "fr", "cart", "show"]));

        assert!(result.is_err(), "fr must not parse");
    }
}
