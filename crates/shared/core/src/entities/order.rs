use uuid::Uuid;

/// Exchange-assigned order identifier
///
/// Opaque to agents. Assigned when a limit order is accepted and retired by a
/// cancellation or a fill; agents compare ids by identity only.
pub type OrderId = Uuid;
