//! Cart and customer commands.

use std::sync::Arc;

use loza::{
    customer::{CustomerSession, TokenStore},
    i18n::{Catalog, Locale, MessageId},
    identity::{FileStore, IdentityStore},
    session::{CartSession, MutationOutcome, SessionConfig, SessionError, TracingObserver},
};
use loza_storefront::{StorefrontClient, StorefrontGateway};
use tracing::info;

use crate::{
    config::{CartCommand, CartSubcommand, CliConfig, Commands, CustomerCommand, CustomerSubcommand},
    render::{render_cart, render_customer, terms_prompt},
};

pub(crate) async fn run(config: CliConfig) -> Result<(), String> {
    let catalog =
        Catalog::load().map_err(|error| format!("invalid message catalogue: {error}"))?;

    let gateway = Arc::new(StorefrontGateway::new(
        StorefrontClient::new(config.storefront.client_config())
            .map_err(|error| format!("failed to build storefront client: {error}"))?,
    ));

    let store = Arc::new(FileStore::new(&config.session.session_file));

    let session_config = SessionConfig {
        call_timeout: config.storefront.timeout(),
    };

    match config.command {
        Commands::Cart(CartCommand { command }) => {
            let session = CartSession::new(gateway, IdentityStore::new(store))
                .with_observer(Arc::new(TracingObserver))
                .with_config(session_config);

            let view = CartView {
                session: &session,
                catalog: &catalog,
                locale: config.session.locale,
            };

            run_cart(&view, command).await
        }
        Commands::Customer(CustomerCommand { command }) => {
            let session =
                CustomerSession::new(gateway, TokenStore::new(store)).with_config(session_config);

            run_customer(&session, &catalog, config.session.locale, command).await
        }
    }
}

async fn run_cart(view: &CartView<'_>, command: CartSubcommand) -> Result<(), String> {
    let session = view.session;

    match command {
        CartSubcommand::Show => {
            session.start().await.map_err(|error| view.failure(&error))?;
            view.print_cart();
        }
        CartSubcommand::Add {
            merchandise_id,
            quantity,
        } => {
            let outcome = session
                .add_to_cart(&merchandise_id, quantity)
                .await
                .map_err(|error| view.failure(&error))?;

            view.report(outcome);
        }
        CartSubcommand::Update { line_id, quantity } => {
            session.start().await.map_err(|error| view.failure(&error))?;

            let outcome = session
                .update_quantity(&line_id, quantity)
                .await
                .map_err(|error| view.failure(&error))?;

            view.report(outcome);
        }
        CartSubcommand::Remove { line_id } => {
            session.start().await.map_err(|error| view.failure(&error))?;

            let outcome = session
                .remove_from_cart(&line_id)
                .await
                .map_err(|error| view.failure(&error))?;

            view.report(outcome);
        }
        CartSubcommand::Checkout { accept_terms } => {
            if !accept_terms {
                return Err(terms_prompt(view.catalog, view.locale));
            }

            session.start().await.map_err(|error| view.failure(&error))?;

            match session.checkout_url(view.locale) {
                Ok(Some(url)) => emit(&format!("{}: {url}", view.text(MessageId::Checkout))),
                Ok(None) => emit(view.text(MessageId::CartEmpty)),
                Err(error) => return Err(error.to_string()),
            }
        }
        CartSubcommand::Forget => {
            session.forget().await.map_err(|error| view.failure(&error))?;

            info!("stored cart forgotten");

            emit(view.text(MessageId::CartEmpty));
        }
    }

    Ok(())
}

async fn run_customer(
    session: &CustomerSession,
    catalog: &Catalog,
    locale: Locale,
    command: CustomerSubcommand,
) -> Result<(), String> {
    match command {
        CustomerSubcommand::Show => {
            session.start().await.map_err(|error| error.to_string())?;
        }
        CustomerSubcommand::Login { email, password } => {
            session.login(&email, &password).await.map_err(|error| {
                format!("{}\n{error}", catalog.get(locale, MessageId::LoginFailed))
            })?;

            info!("customer signed in");
        }
        CustomerSubcommand::Logout => {
            session.logout().await;

            info!("customer signed out");
        }
    }

    emit(&render_customer(session.customer().as_deref(), catalog, locale));

    Ok(())
}

struct CartView<'a> {
    session: &'a CartSession,
    catalog: &'a Catalog,
    locale: Locale,
}

impl CartView<'_> {
    fn text(&self, id: MessageId) -> &str {
        self.catalog.get(self.locale, id)
    }

    fn print_cart(&self) {
        let snapshot = self.session.current_snapshot();

        emit(&render_cart(snapshot.as_deref(), self.catalog, self.locale));
    }

    fn report(&self, outcome: MutationOutcome) {
        match outcome {
            MutationOutcome::Applied => {}
            MutationOutcome::AlreadySatisfied => emit(self.text(MessageId::LineAlreadyRemoved)),
            MutationOutcome::CartExpired => emit(self.text(MessageId::CartExpired)),
        }

        self.print_cart();
    }

    fn failure(&self, error: &SessionError) -> String {
        format!("{}\n{error}", self.text(MessageId::CartError))
    }
}

#[expect(clippy::print_stdout, reason = "command output is written to stdout")]
fn emit(text: &str) {
    println!("{text}");
}
