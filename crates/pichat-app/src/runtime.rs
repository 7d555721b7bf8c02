//! Generic runtime for application orchestration.
//!
//! The Runtime performs the login handshake and then drives the event loop,
//! coordinating between:
//! - [`App`]: session state machine
//! - [`Heartbeat`]: idle keepalive timer
//! - [`Driver`]: platform-specific I/O

use pichat_proto::{ReplyClass, classify, reply_body};
use thiserror::Error;

use crate::{App, AppAction, AppEvent, Credentials, Driver, HEARTBEAT_INTERVAL, Heartbeat};

/// Errors that end a session.
#[derive(Debug, Error)]
pub enum RuntimeError<E> {
    /// The driver failed: terminal error or lost connection.
    #[error("driver error: {0}")]
    Driver(#[source] E),

    /// The server rejected the login. Holds the server's reason.
    #[error("login rejected: {0}")]
    AuthRejected(String),
}

/// Generic runtime that orchestrates App, Heartbeat and Driver.
///
/// # Type Parameters
///
/// - `D`: Platform-specific I/O driver
pub struct Runtime<D>
where
    D: Driver,
{
    driver: D,
    app: App,
    credentials: Credentials,
    heartbeat: Heartbeat<D::Instant>,
}

impl<D> Runtime<D>
where
    D: Driver,
{
    /// Create a new runtime with the given driver and credentials.
    pub fn new(driver: D, credentials: Credentials) -> Self {
        let app = App::new(credentials.username());
        let heartbeat = Heartbeat::new(driver.now(), HEARTBEAT_INTERVAL);
        Self { driver, app, credentials, heartbeat }
    }

    /// Log in, then run the main event loop until the user quits.
    ///
    /// The driver is stopped on every exit path.
    ///
    /// # Errors
    ///
    /// Returns [`RuntimeError::AuthRejected`] if the server rejects the
    /// login, or [`RuntimeError::Driver`] on an I/O error.
    pub async fn run(mut self) -> Result<(), RuntimeError<D::Error>> {
        let result = self.run_session().await;
        self.driver.stop();
        result
    }

    async fn run_session(&mut self) -> Result<(), RuntimeError<D::Error>> {
        self.login().await?;

        let actions = self.app.handle(AppEvent::LoggedIn);
        if self.process_actions(actions).await? {
            return Ok(());
        }

        loop {
            let should_quit = self.process_cycle().await?;
            if should_quit {
                break;
            }
        }
        tracing::info!("session closed by user");
        Ok(())
    }

    /// Send LOGIN and wait for exactly one reply.
    async fn login(&mut self) -> Result<(), RuntimeError<D::Error>> {
        tracing::info!(username = self.credentials.username(), "logging in");

        let line = self.credentials.login_request().encode();
        self.driver.send_line(line).await.map_err(RuntimeError::Driver)?;
        let reply = self.driver.recv_reply().await.map_err(RuntimeError::Driver)?;
        self.heartbeat.touch(self.driver.now());

        match classify(&reply) {
            ReplyClass::Error => {
                let reason = String::from_utf8_lossy(reply_body(&reply)).into_owned();
                tracing::warn!(%reason, "login rejected");
                Err(RuntimeError::AuthRejected(reason))
            },
            ReplyClass::Info => {
                tracing::info!("logged in");
                Ok(())
            },
        }
    }

    /// Process one cycle of the event loop.
    ///
    /// Returns `true` if the application should quit.
    async fn process_cycle(&mut self) -> Result<bool, RuntimeError<D::Error>> {
        let event = self.driver.poll_event().await.map_err(RuntimeError::Driver)?;
        if let Some(event) = event {
            if matches!(event, AppEvent::Data(_)) {
                self.heartbeat.touch(self.driver.now());
            }
            let actions = self.app.handle(event);
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        let now = self.driver.now();
        if self.heartbeat.is_due(now) {
            tracing::debug!("idle, sending keepalive");
            // Restart the period even when a reply is still outstanding
            self.heartbeat.touch(now);
            let actions = self.app.ping();
            if self.process_actions(actions).await? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Execute actions returned by the App.
    ///
    /// Returns `true` if should quit.
    async fn process_actions(
        &mut self,
        actions: Vec<AppAction>,
    ) -> Result<bool, RuntimeError<D::Error>> {
        for action in actions {
            match action {
                AppAction::Render(region) => {
                    self.driver.render(&self.app, region).map_err(RuntimeError::Driver)?;
                },
                AppAction::Send(request) => {
                    tracing::debug!(command = request.command(), "sending request");
                    self.driver.send_line(request.encode()).await.map_err(RuntimeError::Driver)?;
                    self.heartbeat.touch(self.driver.now());
                },
                AppAction::Quit => return Ok(true),
            }
        }
        Ok(false)
    }

    /// The session state, for inspection.
    pub fn app(&self) -> &App {
        &self.app
    }

    /// The driver, for inspection.
    pub fn driver(&self) -> &D {
        &self.driver
    }
}
