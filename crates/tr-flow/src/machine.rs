//! The login flow as an explicit finite-state machine.
//!
//! Each state performs one page interaction and names its successor, so
//! "optional branch absent" and "required step missing" are distinct
//! transition outcomes rather than nested conditionals. The sequence:
//!
//! ```text
//! Navigate ──► InitialLoginButton ──clicked──► RedirectWait ──► EnterEmail
//!                      │                                            ▲
//!                      └──────────absent──────────────────────────┘
//! EnterEmail ──► AdvanceToPassword ──► EnterPassword ──► Submit
//! Submit ──► AuthWait ──► SettleDelay ──► Done
//! ```

use std::fmt;

use tracing::debug;

use tr_config::{FlowSettings, SelectorSettings};
use tr_types::{AppError, AppResult, LoginPage, LoginRequest};

/// Named states of the login sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Navigate,
    InitialLoginButton,
    RedirectWait,
    EnterEmail,
    AdvanceToPassword,
    EnterPassword,
    Submit,
    AuthWait,
    SettleDelay,
    Done,
}

impl fmt::Display for FlowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlowStep::Navigate => "navigate",
            FlowStep::InitialLoginButton => "initial_login_button",
            FlowStep::RedirectWait => "redirect_wait",
            FlowStep::EnterEmail => "enter_email",
            FlowStep::AdvanceToPassword => "advance_to_password",
            FlowStep::EnterPassword => "enter_password",
            FlowStep::Submit => "submit",
            FlowStep::AuthWait => "auth_wait",
            FlowStep::SettleDelay => "settle_delay",
            FlowStep::Done => "done",
        };
        f.write_str(name)
    }
}

/// Drives one [`LoginPage`] through the login sequence.
pub struct LoginFlow<'a> {
    page: &'a dyn LoginPage,
    flow: &'a FlowSettings,
    selectors: &'a SelectorSettings,
}

impl<'a> LoginFlow<'a> {
    pub fn new(
        page: &'a dyn LoginPage,
        flow: &'a FlowSettings,
        selectors: &'a SelectorSettings,
    ) -> Self {
        Self {
            page,
            flow,
            selectors,
        }
    }

    /// Run the state machine to completion. Returning `Ok` means the
    /// sequence finished; whether a token was captured is resolved
    /// afterwards.
    pub async fn run(&self, request: &LoginRequest) -> AppResult<()> {
        let mut step = FlowStep::Navigate;
        while step != FlowStep::Done {
            debug!("Flow step: {}", step);
            step = self.advance(step, request).await?;
        }
        Ok(())
    }

    async fn advance(&self, step: FlowStep, request: &LoginRequest) -> AppResult<FlowStep> {
        match step {
            FlowStep::Navigate => {
                self.page.goto(&request.target_url).await?;
                Ok(FlowStep::InitialLoginButton)
            }

            // Some deployments present an intermediate page with its own
            // "Log in" affordance; absence is a branch, not an error.
            FlowStep::InitialLoginButton => {
                let clicked = self
                    .page
                    .try_click_first(
                        &self.selectors.initial_login,
                        self.flow.initial_button_timeout(),
                    )
                    .await?;
                if clicked {
                    Ok(FlowStep::RedirectWait)
                } else {
                    // No click, no pending navigation to the identity
                    // provider; go straight to the email form.
                    Ok(FlowStep::EnterEmail)
                }
            }

            FlowStep::RedirectWait => {
                self.page
                    .wait_for_navigation(self.flow.redirect_timeout())
                    .await?;
                Ok(FlowStep::EnterEmail)
            }

            FlowStep::EnterEmail => {
                self.page
                    .type_into_first(
                        &self.selectors.email,
                        &request.username,
                        self.flow.element_timeout(),
                    )
                    .await?;
                Ok(FlowStep::AdvanceToPassword)
            }

            // Single-page IdP UIs show email and password together;
            // multi-page ones need a "Next" click between them.
            FlowStep::AdvanceToPassword => {
                if !self.page.is_present(&self.selectors.password).await {
                    self.page
                        .click_first(&self.selectors.submit, self.flow.element_timeout())
                        .await?;
                    tokio::time::sleep(self.flow.advance_settle()).await;
                }
                Ok(FlowStep::EnterPassword)
            }

            FlowStep::EnterPassword => {
                self.page
                    .type_into_first(
                        &self.selectors.password,
                        &request.password,
                        self.flow.element_timeout(),
                    )
                    .await?;
                Ok(FlowStep::Submit)
            }

            FlowStep::Submit => {
                self.page
                    .click_first(&self.selectors.submit, self.flow.element_timeout())
                    .await?;
                Ok(FlowStep::AuthWait)
            }

            // Some flows complete via in-page redirect rather than a full
            // navigation event, so this timeout is not fatal.
            FlowStep::AuthWait => {
                match self
                    .page
                    .wait_for_navigation(self.flow.auth_timeout())
                    .await
                {
                    Ok(()) => {}
                    Err(AppError::NavigationTimeout(_)) => {
                        debug!("No post-login navigation observed, assuming in-page redirect");
                    }
                    Err(e) => return Err(e),
                }
                Ok(FlowStep::SettleDelay)
            }

            // Grace period for asynchronous token-bearing requests and
            // storage writes; there is no DOM signal for token persistence.
            FlowStep::SettleDelay => {
                tokio::time::sleep(self.flow.settle()).await;
                Ok(FlowStep::Done)
            }

            FlowStep::Done => Ok(FlowStep::Done),
        }
    }
}
