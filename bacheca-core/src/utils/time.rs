use time::{
    format_description::{well_known::Rfc3339, BorrowedFormatItem},
    macros::format_description,
    OffsetDateTime, UtcOffset,
};

// ISO-8601 con millisecondi e suffisso Z
const ISO_MILLIS: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:3]Z");

/// Restituisce l'istante corrente in UTC come ISO-8601 (es. "2025-11-02T12:34:56.789Z").
pub fn now_timestamp() -> String {
    format_timestamp(OffsetDateTime::now_utc())
}

/// Formatta un istante nello stesso formato di [`now_timestamp`].
/// L'istante viene prima portato in UTC, dato che il formato termina con `Z`.
pub fn format_timestamp(at: OffsetDateTime) -> String {
    at.to_offset(UtcOffset::UTC)
        .format(ISO_MILLIS)
        .expect("error formatting timestamp")
}

/// Interpreta un timestamp ISO-8601/RFC3339, `None` se non valido.
pub fn parse_timestamp(s: &str) -> Option<OffsetDateTime> {
    OffsetDateTime::parse(s, &Rfc3339).ok()
}
