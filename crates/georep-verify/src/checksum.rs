/// Gate deciding whether a downloaded digest must match the declared one.
///
/// The primary does not always declare a checksum (large attachments are
/// digested asynchronously, most artifact kinds never are), and verification
/// can be switched off by a feature flag. In both cases nothing is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChecksumCheck<'a> {
    expected: Option<&'a str>,
}

impl<'a> ChecksumCheck<'a> {
    pub fn new(expected: Option<&'a str>, enabled: bool) -> Self {
        let expected = expected.filter(|e| enabled && !e.trim().is_empty());
        Self { expected }
    }

    /// Whether the caller needs to compute a digest at all.
    pub fn is_required(&self) -> bool { self.expected.is_some() }

    pub fn expected(&self) -> Option<&'a str> { self.expected }

    /// Case-sensitive comparison; always `false` when the check is skipped.
    pub fn is_mismatch(&self, actual: &str) -> bool {
        match self.expected {
            Some(expected) => expected != actual,
            None => false,
        }
    }
}

pub fn checksum_mismatch(expected: Option<&str>, actual: &str, enabled: bool) -> bool {
    ChecksumCheck::new(expected, enabled).is_mismatch(actual)
}
