//! Menu loop and flow dispatch.

use anyhow::{Context, Result};
use inquire::InquireError;
use tracing::{debug, info};

use gridpay_core::flows::{self, AuthStart};
use gridpay_core::{ChainRpc, Environment, GridApi, SessionContext, Token};

use crate::ui::prompt;
use crate::ui::{ConsolePresenter, MenuChoice};

/// Interactive application state: the API handles and the current login.
pub struct App<A, R> {
    api: A,
    rpc: R,
    environment: Environment,
    ctx: SessionContext,
    presenter: ConsolePresenter,
}

impl<A: GridApi, R: ChainRpc> App<A, R> {
    pub fn new(api: A, rpc: R, environment: Environment, presenter: ConsolePresenter) -> Self {
        Self {
            api,
            rpc,
            environment,
            ctx: SessionContext::new(),
            presenter,
        }
    }

    /// Run the menu until the user exits.
    ///
    /// A failed flow is reported and the menu shown again. Cancelling a
    /// prompt abandons the flow; cancelling the menu itself exits.
    pub async fn run(&mut self) -> Result<()> {
        println!("gridpay ({} / {})", self.environment, self.environment.cluster());

        loop {
            let choice = match prompt::menu() {
                Ok(choice) => choice,
                Err(e) if prompt::is_cancelled(&e) => break,
                Err(e) => return Err(e.into()),
            };
            debug!(?choice, "Menu selection");

            let result = match choice {
                MenuChoice::Login => self.login().await,
                MenuChoice::Balance => self.balance().await,
                MenuChoice::TransferUsdc => self.transfer(Token::Usdc).await,
                MenuChoice::TransferSol => self.transfer(Token::Sol).await,
                MenuChoice::Exit => break,
            };

            if let Err(e) = result {
                match e.downcast_ref::<InquireError>() {
                    Some(inquire_err) if prompt::is_cancelled(inquire_err) => {
                        println!("Cancelled");
                    }
                    Some(_) => return Err(e),
                    None => self.presenter.error(&e),
                }
            }
            println!();
        }

        self.ctx.clear();
        info!("Session cleared");
        println!("Goodbye!");
        Ok(())
    }

    async fn login(&mut self) -> Result<()> {
        let email = prompt::email()?;

        let pending = match flows::start_auth(&self.api, &email, &self.presenter).await? {
            AuthStart::OtpSent(pending) => pending,
            AuthStart::Uncertain { pending, error } => {
                if !prompt::continue_uncertain(&error)? {
                    return Ok(());
                }
                pending
            }
        };

        let code = prompt::otp(&pending.email)?;
        let (session, secrets) = flows::verify_otp(&self.api, &pending, &code, &self.presenter)
            .await
            .context("Login failed")?;
        self.ctx.login(session, secrets);
        Ok(())
    }

    async fn balance(&self) -> Result<()> {
        flows::check_balance(&self.api, &self.ctx, self.environment, &self.presenter).await?;
        Ok(())
    }

    async fn transfer(&self, token: Token) -> Result<()> {
        // Checked before prompting; the flow checks again
        self.ctx.require_signer()?;

        let recipient = prompt::recipient()?;
        let amount = prompt::amount(token)?;

        match token {
            Token::Usdc => {
                flows::transfer_usdc(
                    &self.api,
                    &self.ctx,
                    self.environment,
                    &recipient,
                    &amount,
                    &self.presenter,
                )
                .await?
            }
            Token::Sol => {
                flows::transfer_sol(
                    &self.api,
                    &self.rpc,
                    &self.ctx,
                    self.environment,
                    &recipient,
                    &amount,
                    &self.presenter,
                )
                .await?
            }
        };
        Ok(())
    }
}
