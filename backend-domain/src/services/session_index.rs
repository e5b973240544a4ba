// Session identity index
// Maps a session key to the address it last joined from.

use std::collections::HashMap;

pub const JOIN_MARKER: &str = " ^5entered this server";

#[derive(Debug, Clone, Default)]
pub struct SessionIdentityIndex {
    addresses: HashMap<String, String>,
}

impl SessionIdentityIndex {
    pub fn build<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = Self::default();
        for line in lines {
            if let Some((identity, address)) = parse_join_line(line.as_ref()) {
                index.addresses.insert(identity, address);
            }
        }
        index
    }

    pub fn address_of(&self, identity: &str) -> Option<&str> {
        self.addresses.get(identity).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.addresses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.addresses.is_empty()
    }
}

/// `... 1.2.3.4:28960 ^5entered this server ... <identity>`
pub fn parse_join_line(line: &str) -> Option<(String, String)> {
    let marker = line.find(JOIN_MARKER)?;
    let before = &line[..marker];
    let segments: Vec<&str> = before.split(':').collect();
    if segments.len() < 2 {
        return None;
    }
    let address = segments[segments.len() - 2].split(' ').last()?;
    let identity = line.split(' ').last()?;
    if address.is_empty() || identity.is_empty() {
        return None;
    }
    Some((identity.to_string(), address.to_string()))
}
