use cipherlot_types::Cid;

use crate::error::{ProtocolError, ProtocolResult};

/// Scheme and authority of a manifest deep link.
pub const DEEP_LINK_PREFIX: &str = "vault://cid/";

/// External reference to a published manifest.
pub fn deep_link(manifest: &Cid) -> String {
    format!("{DEEP_LINK_PREFIX}{manifest}")
}

/// Extract the manifest identifier from a deep link.
pub fn parse_deep_link(link: &str) -> ProtocolResult<Cid> {
    let id = link
        .strip_prefix(DEEP_LINK_PREFIX)
        .ok_or_else(|| ProtocolError::InvalidDeepLink(link.to_string()))?;
    Ok(Cid::parse(id)?)
}
