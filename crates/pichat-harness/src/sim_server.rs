//! In-memory chat server for simulation.
//!
//! Answers one client's request lines the way the real server does: a `+` or
//! `-` status byte, the reply text, and a trailing newline. Other users are
//! plain account entries that tests can mark online and push messages from.

use std::collections::BTreeMap;

use bytes::Bytes;
use pichat_proto::MESSAGE_PREFIX;

/// Status suffix for online users in the roster.
const ONLINE: &str = "<online>";

#[derive(Debug, Clone)]
struct Account {
    password: String,
    online: bool,
}

/// In-memory server serving a single simulated client.
#[derive(Debug, Clone, Default)]
pub struct SimServer {
    accounts: BTreeMap<String, Account>,
    /// Account the simulated client is logged in as.
    session: Option<String>,
    /// Direct messages accepted, as (recipient, message).
    delivered: Vec<(String, String)>,
    /// Broadcasts accepted.
    broadcasts: Vec<String>,
}

impl SimServer {
    /// Create a server with no accounts.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an account, optionally online already.
    #[must_use]
    pub fn with_account(mut self, username: &str, password: &str, online: bool) -> Self {
        self.accounts
            .insert(username.to_string(), Account { password: password.to_string(), online });
        self
    }

    /// Answer one request line with a reply chunk.
    pub fn handle_line(&mut self, line: &str) -> Bytes {
        let reply = match self.process(line.trim()) {
            Ok(body) => format!("+{body}\n"),
            Err(reason) => format!("-{reason}\n"),
        };
        tracing::trace!(line, reply = reply.trim_end(), "sim server");
        Bytes::from(reply)
    }

    /// A chunk pushing a message from `from` to the client.
    pub fn push_message(&self, from: &str, message: &str) -> Bytes {
        Bytes::from(format!("{MESSAGE_PREFIX}[2024-01-01 12:00:00 {from}]: {message}\n"))
    }

    /// Direct messages accepted so far, as (recipient, message).
    pub fn delivered(&self) -> &[(String, String)] {
        &self.delivered
    }

    /// Broadcasts accepted so far.
    pub fn broadcasts(&self) -> &[String] {
        &self.broadcasts
    }

    /// Account the client is logged in as.
    pub fn session(&self) -> Option<&str> {
        self.session.as_deref()
    }

    fn process(&mut self, line: &str) -> Result<String, String> {
        let mut parts = line.split('|');
        let command = parts.next().unwrap_or_default();
        let args: BTreeMap<&str, &str> = parts.filter_map(|part| part.split_once('=')).collect();
        let arg = |key: &str| args.get(key).copied();

        match command {
            "PING" => Ok(String::new()),
            "USERS" => Ok(self.roster()),
            "LOGIN" => match (arg("username"), arg("password")) {
                (Some(username), Some(password)) => self.login(username, password),
                _ => Err("Required args: username, password".to_string()),
            },
            "SEND" => {
                self.require_session()?;
                match (arg("username"), arg("msg")) {
                    (Some(to), Some(message)) => {
                        if !self.accounts.get(to).is_some_and(|a| a.online) {
                            return Err("No such user".to_string());
                        }
                        self.delivered.push((to.to_string(), message.to_string()));
                        Ok(String::new())
                    },
                    _ => Err("Required args: username, msg".to_string()),
                }
            },
            "SNDALL" => {
                self.require_session()?;
                let message = arg("msg").ok_or_else(|| "Required args: msg".to_string())?;
                self.broadcasts.push(message.to_string());
                Ok(String::new())
            },
            _ => Err("Unknown command".to_string()),
        }
    }

    fn login(&mut self, username: &str, password: &str) -> Result<String, String> {
        if self.session.is_some() {
            return Err("Already logged in".to_string());
        }
        match self.accounts.get_mut(username) {
            Some(account) if account.password != password => Err("Wrong password".to_string()),
            Some(account) if account.online => Err("Already logged in".to_string()),
            Some(account) => {
                account.online = true;
                self.session = Some(username.to_string());
                Ok(String::new())
            },
            None => {
                // First login registers the account
                self.accounts.insert(
                    username.to_string(),
                    Account { password: password.to_string(), online: true },
                );
                self.session = Some(username.to_string());
                Ok(String::new())
            },
        }
    }

    fn require_session(&self) -> Result<(), String> {
        if self.session.is_some() { Ok(()) } else { Err("Please log in".to_string()) }
    }

    fn roster(&self) -> String {
        let entries: Vec<String> = self
            .accounts
            .iter()
            .map(|(name, account)| {
                let mut entry = name.clone();
                if self.session.as_deref() == Some(name.as_str()) {
                    entry.push_str(" (you)");
                }
                if account.online {
                    entry.push(' ');
                    entry.push_str(ONLINE);
                }
                entry
            })
            .collect();
        entries.join("\n")
    }
}
