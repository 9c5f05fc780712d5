use uuid::Uuid;

/// Opaque identifier accepted at the unauthenticated boundary.
///
/// Every public route addresses campaigns, subscribers, links and lists by
/// UUID only; internal numeric ids never cross this boundary. Syntax is
/// checked here, before any store lookup, so malformed enumeration probes
/// are rejected cheaply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublicId(Uuid);

impl PublicId {
    pub fn parse(value: &str) -> Result<PublicId, String> {
        Uuid::parse_str(value.trim())
            .map(PublicId)
            .map_err(|_| format!("{} is not a valid identifier.", value))
    }

    /// Template previews are rendered against the nil UUID. Hits carrying it
    /// must never reach the store.
    pub fn is_preview(&self) -> bool {
        self.0.is_nil()
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for PublicId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl std::fmt::Display for PublicId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
