use core::fmt::Write;
use heapless::String;

use crate::constants::{NODE_ROUTE, TOPIC_MAX, URL_MAX};

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    TooLong,
}

impl From<core::fmt::Error> for Error {
    fn from(_: core::fmt::Error) -> Self {
        Error::TooLong
    }
}

/// Joins `path` onto `base` with exactly one `/` between them.
pub fn join_url(base: &str, path: &str) -> Result<String<URL_MAX>, Error> {
    let base = base.trim().trim_end_matches('/');
    let path = path.trim().trim_start_matches('/');

    let mut url: String<URL_MAX> = String::new();
    url.push_str(base).map_err(|_| Error::TooLong)?;
    if !path.is_empty() {
        write!(url, "/{}", path)?;
    }

    Ok(url)
}

// POST here authenticates the node with its secret token, PATCH updates its state
pub fn node_url(base: &str, node_id: &str) -> Result<String<URL_MAX>, Error> {
    let base = base.trim().trim_end_matches('/');

    let mut url: String<URL_MAX> = String::new();
    write!(url, "{}{}{}", base, NODE_ROUTE, node_id)?;

    Ok(url)
}

// The backend publishes "reserved" / "free" on this topic
pub fn node_topic(node_id: &str) -> Result<String<TOPIC_MAX>, Error> {
    let mut topic: String<TOPIC_MAX> = String::new();
    write!(topic, "nodes/{}", node_id)?;

    Ok(topic)
}
