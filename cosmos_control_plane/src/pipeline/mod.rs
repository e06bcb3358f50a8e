use time::{
    OffsetDateTime, format_description::FormatItem, macros::format_description,
};

mod authorization_policy;
mod signature_target;

pub use authorization_policy::AuthorizationPolicy;

#[cfg(test)]
pub(crate) fn parse_rfc3339(s: &str) -> Result<OffsetDateTime, time::error::Parse> {
    use time::format_description::well_known::Rfc3339;
    OffsetDateTime::parse(s, &Rfc3339)
}

const RFC7231_FORMAT: &[FormatItem] = format_description!(
    "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
);

/// RFC 7231: Requirements for Internet Hosts - Application and Support.
///
/// <https://datatracker.ietf.org/doc/html/rfc7231#section-7.1.1.1>
///
/// This format is the preferred HTTP date-based header format, and the format the service expects
/// in the `x-ms-date` header.
/// * <https://datatracker.ietf.org/doc/html/rfc7231#section-7.1.1.2>
/// * <https://datatracker.ietf.org/doc/html/rfc7232>
///
/// Example string: `Sun, 06 Nov 1994 08:49:37 GMT`.
pub fn to_rfc7231(date: &OffsetDateTime) -> String {
    // known format does not panic
    date.format(&RFC7231_FORMAT).unwrap()
}

#[cfg(test)]
mod tests {
    use super::{parse_rfc3339, to_rfc7231};

    #[test]
    fn formats_dates_the_way_the_service_expects() {
        let date = parse_rfc3339("1994-11-06T08:49:37.000000000+00:00").unwrap();
        assert_eq!(to_rfc7231(&date), "Sun, 06 Nov 1994 08:49:37 GMT");
    }
}
