//! Content version from `data_ver.xml`.
//!
//! The one piece of game XML small enough to read directly: a single element
//! whose `Value` attribute names the content version.

use std::path::Path;

use anyhow::{bail, Context, Result};
use herdbook_store::text;
use quick_xml::events::Event;
use quick_xml::Reader;

pub fn content_version(game_folder: &Path) -> Result<String> {
    let path = game_folder.join("data_ver.xml");
    let xml = text::read_to_string(&path)?;

    let mut reader = Reader::from_str(&xml);
    loop {
        match reader
            .read_event()
            .with_context(|| format!("parsing {}", path.display()))?
        {
            Event::Start(element) | Event::Empty(element) => {
                for attribute in element.attributes() {
                    let attribute =
                        attribute.with_context(|| format!("parsing {}", path.display()))?;
                    if attribute.key.as_ref() == b"Value" {
                        return Ok(attribute
                            .unescape_value()
                            .with_context(|| format!("parsing {}", path.display()))?
                            .into_owned());
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }
    bail!("no Value attribute in {}", path.display());
}
