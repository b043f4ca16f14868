//! Extraction of addresses and messages from portal pages
//!
//! Every page the portal serves after login carries the same two structures: an address
//! `<select>` listing the service locations registered to the account, and zero or more
//! message blocks with the notices posted for the selected location.

use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

/// A service location registered to the account
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    /// Value submitted to the portal when switching to this address
    pub id: String,
    /// Display text of the address
    pub name: String,
}

/// A notice posted for the currently selected address
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    /// One paragraph per message item, joined with newlines
    pub text: String,
    /// Set for highlighted (green) notices
    pub warn: bool,
}

/// Data extracted from a single portal page
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Page {
    addresses: Vec<Address>,
    current: Option<usize>,
    messages: Vec<Message>,
}

impl Page {
    /// Parses a portal page
    ///
    /// Parsing is best effort: a body that doesn't look like a portal page (or isn't HTML at
    /// all) yields a page without addresses, current address or messages.
    pub fn parse(body: &str) -> Self {
        let document = Html::parse_document(body);
        let mut page = Page::default();

        let mut selected = false;
        for option in document.select(&ADDRESS_OPTION) {
            page.addresses.push(Address {
                id: option.value().attr("value").unwrap_or_default().to_owned(),
                name: option.text().collect::<String>().trim().to_owned(),
            });

            // The first option marked `selected` wins; until one shows up the first option
            // parsed stands in as the current address.
            let index = page.addresses.len() - 1;
            if !selected && option.value().attr("selected").is_some() {
                page.current = Some(index);
                selected = true;
            }
            if page.current.is_none() {
                page.current = Some(0);
            }
        }

        page.messages = document
            .select(&MESSAGE_BLOCK)
            .map(|block| Message {
                text: block
                    .select(&MESSAGE_ITEM)
                    .map(paragraph)
                    .collect::<Vec<_>>()
                    .join("\n"),
                warn: block.value().classes().any(|class| class == WARN_CLASS),
            })
            .collect();

        page
    }

    /// Addresses in the order the portal lists them
    pub fn addresses(&self) -> &[Address] {
        &self.addresses
    }

    /// The address the page was rendered for
    ///
    /// This is the option the portal marked as selected, or the first address if none was.
    /// `None` only when the page lists no addresses.
    pub fn current_address(&self) -> Option<&Address> {
        self.current.and_then(|index| self.addresses.get(index))
    }

    /// Messages for the current address, in page order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Looks up an address by its display name
    pub fn address_named(&self, name: &str) -> Option<&Address> {
        self.addresses.iter().find(|address| address.name == name)
    }

    pub(crate) fn has_addresses(&self) -> bool {
        !self.addresses.is_empty()
    }
}

/// Collapses the lines of a message item into a single paragraph
fn paragraph(item: ElementRef<'_>) -> String {
    item.text()
        .collect::<String>()
        .split('\n')
        .map(str::trim)
        .collect::<Vec<_>>()
        .join(" ")
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("invalid built-in selector")
}

static ADDRESS_OPTION: LazyLock<Selector> =
    LazyLock::new(|| selector("select#address-select option"));
static MESSAGE_BLOCK: LazyLock<Selector> = LazyLock::new(|| selector("div.claim-message-block"));
static MESSAGE_ITEM: LazyLock<Selector> = LazyLock::new(|| selector("div.claim-message-item"));

const WARN_CLASS: &str = "claim-message-green";
