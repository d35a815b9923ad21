//! Decode an EPC hex string and dump every field the codec sees.
//!
//! Usage:
//!     tag_inspect <EPC-HEX> [KEY=VALUE]...
//!
//! Password entries use the configuration spelling, for example:
//!     tag_inspect DE2900011234567890010200 DE290.access=12345678
//!
//! Without entries every password resolves to its placeholder.

use std::collections::HashMap;
use std::env;

use anyhow::{bail, Result};

use bookwaves_tag::{bytes_to_hex, PasswordStore, Tag, TagFactory, TagFormat};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let Some(epc_hex) = args.next() else {
        bail!("usage: tag_inspect <EPC-HEX> [KEY=VALUE]...");
    };

    let mut passwords = HashMap::new();
    for pair in args {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("password entries must look like DE290.access=VALUE, got {pair:?}");
        };
        passwords.insert(key.to_string(), value.to_string());
    }

    let store = PasswordStore::new();
    let warnings = store.install_from_map(&passwords, TagFormat::De290);
    let factory = TagFactory::new(store);

    let tag = factory.create_tag_from_hex(&epc_hex)?;

    println!("=== Tag Inspection ===");
    println!();
    println!(
        "EPC           {} ({} bytes)",
        bytes_to_hex(tag.epc()),
        tag.epc().len()
    );
    println!(
        "PC            {} (synthesized from EPC length)",
        bytes_to_hex(&tag.pc())
    );
    match tag.format() {
        Some(format) => println!("Format        {format}"),
        None => println!("Format        unknown (raw tag)"),
    }
    println!();

    match &tag {
        Tag::De290(tag) => {
            println!("Item number   {}", tag.item_number());
            match tag.media() {
                Some(media) => println!("Media kind    {media:?} (code {})", tag.media_kind()),
                None => println!("Media kind    unknown code {}", tag.media_kind()),
            }
            println!("Branch        {}", tag.branch());
            println!("Loanable      {}", tag.loanable());
        }
        Tag::De290F(tag) => {
            println!("Item number   {}", tag.item_number());
            println!("Part          {} of {}", tag.part_index(), tag.part_total());
            match tag.media() {
                Some(media) => println!("Media kind    {media:?} (code {})", tag.media_kind()),
                None => println!("Media kind    unknown code {}", tag.media_kind()),
            }
            println!("Branch        {}", tag.branch());
        }
        Tag::De6(tag) => {
            println!("Item number   {}", tag.item_number());
        }
        Tag::Ascii(tag) => {
            println!("Scheme        {:?}", tag.scheme());
            println!("Item id       {}", tag.item_id());
        }
        Tag::Barcode(tag) => {
            println!("Barcode       {}", tag.barcode());
        }
        Tag::Raw(_) => {
            println!("No decoded fields.");
        }
    }

    if let Some(access) = tag.access_password() {
        println!("Access pw     {access}");
    }
    if let Some(kill) = tag.kill_password() {
        println!("Kill pw       {kill}");
    }
    if let Some(secret) = tag.secret_password() {
        println!("Secret pw     {secret}");
    }

    let reencoded = tag.encode_epc();
    println!();
    if reencoded == tag.epc() {
        println!("Re-encode     OK (byte-identical)");
    } else {
        println!("Re-encode     MISMATCH: {}", bytes_to_hex(&reencoded));
    }

    if !warnings.is_empty() {
        println!();
        println!("Configuration warnings:");
        for warning in &warnings {
            println!("  {warning:?}");
        }
    }

    Ok(())
}
