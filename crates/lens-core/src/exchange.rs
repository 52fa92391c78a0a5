//! Vendor exchange codes and their readable names.

/// Exchange codes as reported by the vendor, with the name shown to users.
pub const EXCHANGES: [(&str, &str); 8] = [
    ("NMS", "NASDAQ"),
    ("NYQ", "NYSE"),
    ("ASE", "AMEX"),
    ("MCE", "Mercado continuo"),
    ("TOR", "Toronto Stock Exchange"),
    ("LSE", "London Stock Exchange"),
    ("JPX", "Tokyo Stock Exchange"),
    ("OTC", "Over the Counter"),
];

/// Returns the readable name for an exchange code, or the code itself when
/// it is not in [`EXCHANGES`].
#[must_use]
pub fn exchange_name(code: &str) -> &str {
    EXCHANGES
        .iter()
        .find(|(known, _)| *known == code)
        .map_or(code, |&(_, name)| name)
}
