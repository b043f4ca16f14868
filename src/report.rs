//! Plain text console report

use std::io::{self, Write};

use anyhow::Context;

use crate::page::{Address, Message};
use crate::Session;

/// Printed before each message
pub const MESSAGE_DELIMITER: &str = "---";
/// Printed before every address block but the first
pub const ADDRESS_DELIMITER: &str = "===";

/// Writes the address name followed by its messages
pub fn write_address(
    out: &mut impl Write,
    address: &Address,
    messages: &[Message],
) -> io::Result<()> {
    writeln!(out, "{}", address.name)?;
    for message in messages {
        writeln!(out, "{MESSAGE_DELIMITER}")?;
        writeln!(out, "{}", message.text)?;
    }
    Ok(())
}

pub fn write_address_delimiter(out: &mut impl Write) -> io::Result<()> {
    writeln!(out, "{ADDRESS_DELIMITER}")
}

/// Writes the current address of a freshly logged in session, then switches to every other
/// address in portal order and writes each of them
///
/// # Errors
///
/// Fails if an address switch fails, if a page lists no current address, or if writing to
/// `out` fails.
pub async fn write_all(out: &mut impl Write, session: &mut Session) -> anyhow::Result<()> {
    write_current(out, session)?;

    let others = session.addresses().iter().skip(1).cloned().collect::<Vec<_>>();
    for address in &others {
        write_address_delimiter(out)?;
        session.select_address(address).await?;
        write_current(out, session)?;
    }

    Ok(())
}

fn write_current(out: &mut impl Write, session: &Session) -> anyhow::Result<()> {
    let current = session
        .current_address()
        .context("can't parse current address")?;
    write_address(out, current, session.messages())?;
    Ok(())
}
