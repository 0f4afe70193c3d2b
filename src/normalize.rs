//! Hostname to label-sequence normalization.

use crate::error::Result;
use crate::idna::{domain_to_ascii, label_to_unicode, Idna};

/// A host split into lowercase labels, ready for matching
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Labels {
    /// ASCII labels in written order
    pub ascii: Vec<String>,
    /// Set when the input carried non-ASCII text that was converted
    pub unicode: bool,
}

impl Labels {
    /// Split an ASCII domain on `.`
    fn split(ascii: &str, unicode: bool) -> Self {
        Self {
            ascii: ascii.split('.').map(str::to_string).collect(),
            unicode,
        }
    }

    pub fn len(&self) -> usize {
        self.ascii.len()
    }
}

/// Lowercase a host and strip one trailing `.`, as used for cache keys.
pub(crate) fn host_key(host: &str) -> String {
    host.strip_suffix('.').unwrap_or(host).to_lowercase()
}

/// Normalize a hostname string.
///
/// Non-ASCII hosts are converted to ASCII as a whole before splitting, so
/// `。` and friends separate labels. One trailing `.` is stripped and the
/// rest is lowercased and split on `.`. Returns `None` for an empty host.
pub(crate) fn normalize_host(host: &str, idna: &dyn Idna) -> Result<Option<Labels>> {
    let lowered = host.to_lowercase();
    let unicode = !lowered.is_ascii();
    let ascii = domain_to_ascii(idna, &lowered)?;

    let ascii = ascii.strip_suffix('.').unwrap_or(&ascii);
    if ascii.is_empty() {
        return Ok(None);
    }
    Ok(Some(Labels::split(ascii, unicode)))
}

/// Normalize a caller-supplied label sequence without touching the input.
///
/// ASCII sequences keep their shape. A sequence carrying Unicode is joined,
/// converted and split again, so it yields the labels the equivalent host
/// string would. Returns `None` for an empty sequence.
pub(crate) fn normalize_labels<S: AsRef<str>>(
    labels: &[S],
    idna: &dyn Idna,
) -> Result<Option<Labels>> {
    if labels.is_empty() {
        return Ok(None);
    }

    let lowered = labels
        .iter()
        .map(|label| label.as_ref().to_lowercase())
        .collect::<Vec<_>>();
    if lowered.iter().all(|label| label.is_ascii()) {
        return Ok(Some(Labels {
            ascii: lowered,
            unicode: false,
        }));
    }

    let ascii = domain_to_ascii(idna, &lowered.join("."))?;
    Ok(Some(Labels::split(&ascii, true)))
}

/// Join ASCII labels back into a domain, decoding to Unicode when requested.
pub(crate) fn join_labels(labels: &[String], unicode: bool, idna: &dyn Idna) -> Result<String> {
    if !unicode {
        return Ok(labels.join("."));
    }

    let decoded = labels
        .iter()
        .map(|label| label_to_unicode(idna, label))
        .collect::<Result<Vec<_>>>()?;
    Ok(decoded.join("."))
}
