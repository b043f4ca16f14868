//! Client library for the Kyiv 1557 utility portal
//!
//! This library logs into the 1557.kyiv.ua portal and retrieves the account's service
//! addresses together with the notices (outages, maintenance) posted for each of them.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> anyhow::Result<()> {
//! let mut session = kyiv1557::Session::login("0501234567", "secret").await?;
//!
//! let others: Vec<_> = session.addresses().iter().skip(1).cloned().collect();
//! for address in &others {
//!     session.select_address(address).await?;
//!     for message in session.messages() {
//!         println!("{}", message.text);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

mod config;
pub use config::{ConfigError, Credentials, DEFAULT_CONFIG_PATH};
mod page;
pub use page::{Address, Message, Page};
pub mod report;

/// An authenticated session with the 1557 portal
///
/// Created by [`Session::login()`], which leaves the session holding the page the portal
/// shows right after login. [`Session::select_address()`] switches to another address and
/// replaces the page with the one for that address.
pub struct Session {
    base: String,
    client: reqwest::Client,
    page: Page,
}

impl Session {
    /// Logs into the portal with a phone number and password
    ///
    /// # Errors
    ///
    /// Reasons this could error include:
    ///
    /// - The HTTP client can't be created
    /// - Either login request fails or returns an error status
    pub async fn login(phone: &str, password: &str) -> anyhow::Result<Self> {
        Self::login_at(BASE, phone, password).await
    }

    /// Logs into the portal with credentials loaded from a file
    ///
    /// See [`Credentials::load()`].
    pub async fn login_with(credentials: &Credentials) -> anyhow::Result<Self> {
        Self::login(&credentials.phone, credentials.password()).await
    }

    /// Logs into a portal served from `base`
    ///
    /// `base` must end with a `/`. The phone number is posted to `<base>login`; the portal
    /// answers with a redirect to the password form, which receives the password. Cookies
    /// set along the way are kept for all later requests made through this session.
    #[instrument(skip_all)]
    pub async fn login_at(
        base: impl Into<String>,
        phone: &str,
        password: &str,
    ) -> anyhow::Result<Self> {
        let base = base.into();

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STR));
        let client = reqwest::Client::builder()
            .cookie_store(true)
            .default_headers(headers)
            .build()
            .context("failed to create HTTP client")?;

        let login_url = join_url(&base, &["login"]);
        debug!(url = %login_url, "submitting phone number");
        let response = client
            .post(&login_url)
            .form(&PhoneForm { phone })
            .send()
            .await
            .context("phone number request failed")?
            .error_for_status()?;

        // The password form lives wherever the portal redirected us to.
        let password_url = response.url().clone();
        debug!(url = %password_url, "submitting password");
        let response = client
            .post(password_url)
            .form(&PasswordForm { pass: password })
            .send()
            .await
            .context("password request failed")?
            .error_for_status()?;

        let body = response.text().await?;
        let mut session = Session {
            base,
            client,
            page: Page::default(),
        };
        session.update(&body);
        info!(
            addresses = session.addresses().len(),
            messages = session.messages().len(),
            "logged in"
        );
        Ok(session)
    }

    /// Switches the portal to `address` and loads its messages
    ///
    /// The address list, current address and messages are all replaced by what the portal
    /// returns for the new address.
    ///
    /// # Errors
    ///
    /// Fails if the request fails or returns an error status.
    #[instrument(skip_all, fields(id = %address.id))]
    pub async fn select_address(&mut self, address: &Address) -> anyhow::Result<()> {
        let url = join_url(&self.base, &[]);
        debug!(%url, "selecting address");
        let body = self
            .client
            .post(&url)
            .form(&AddressForm {
                main_address: &address.id,
            })
            .send()
            .await
            .context("address selection request failed")?
            .error_for_status()?
            .text()
            .await?;

        self.update(&body);
        info!(messages = self.messages().len(), "selected address");
        Ok(())
    }

    /// Switches to the address with the given display name
    ///
    /// Returns `false` without contacting the portal if no such address is listed.
    pub async fn select_address_named(&mut self, name: &str) -> anyhow::Result<bool> {
        let Some(address) = self.page.address_named(name).cloned() else {
            return Ok(false);
        };

        self.select_address(&address).await?;
        Ok(true)
    }

    /// Addresses registered to the account, in portal order
    pub fn addresses(&self) -> &[Address] {
        self.page.addresses()
    }

    /// The address the current messages belong to
    pub fn current_address(&self) -> Option<&Address> {
        self.page.current_address()
    }

    pub fn current_address_id(&self) -> Option<&str> {
        self.current_address().map(|address| address.id.as_str())
    }

    /// Messages posted for the current address
    pub fn messages(&self) -> &[Message] {
        self.page.messages()
    }

    pub fn address_named(&self, name: &str) -> Option<&Address> {
        self.page.address_named(name)
    }

    fn update(&mut self, body: &str) {
        self.page = Page::parse(body);
        if !self.page.has_addresses() {
            warn!("no addresses found on page");
        }
    }
}

/// Builds a portal URL from path segments
///
/// Segments are joined with `/` and are not escaped.
pub fn url(segments: &[&str]) -> String {
    join_url(BASE, segments)
}

fn join_url(base: &str, segments: &[&str]) -> String {
    format!("{base}{}", segments.join("/"))
}

#[derive(Serialize)]
struct PhoneForm<'a> {
    phone: &'a str,
}

#[derive(Serialize)]
struct PasswordForm<'a> {
    pass: &'a str,
}

#[derive(Serialize)]
struct AddressForm<'a> {
    #[serde(rename = "main-address")]
    main_address: &'a str,
}

/// Root of the 1557 portal
pub const BASE: &str = "https://1557.kyiv.ua/";
const USER_AGENT_STR: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_segments_is_base() {
        assert_eq!(url(&[]), "https://1557.kyiv.ua/");
    }

    #[test]
    fn url_joins_segments() {
        assert_eq!(url(&["login"]), "https://1557.kyiv.ua/login");
        assert_eq!(url(&["login", "pass"]), "https://1557.kyiv.ua/login/pass");
    }

    #[test]
    fn url_segments_are_not_escaped() {
        assert_eq!(join_url("http://localhost/", &["a b", "c?d"]), "http://localhost/a b/c?d");
    }
}
