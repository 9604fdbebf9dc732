//! Tag lookup in free-text metadata blobs
//!
//! Metadata arrives as a multi-line text dump with one `GGGG,EEEE  Name: value`
//! entry per line. Lookup is a plain substring search, not a DICOM parser.

use crate::types::Parsed;
use dicom::core::Tag;

/// Format a dictionary tag as the `GGGG,EEEE` key used in metadata text
#[must_use]
pub fn tag_key(tag: Tag) -> String {
    format!("{:04X},{:04X}", tag.group(), tag.element())
}

/// Value of the first line containing `key`, or `None`
///
/// The value is the text after the first `": "` on that line, or the whole
/// line from the key onwards when there is no separator. A key on the last,
/// unterminated line is not found.
#[must_use]
pub fn get_tag_value<'a>(meta: &'a str, key: &str) -> Option<&'a str> {
    let start = meta.find(key)?;
    let end = start + meta[start..].find('\n')?;
    let line = &meta[start..end];

    let value = match line.find(": ") {
        Some(sep) if sep > 0 => &line[sep + 2..],
        _ => line,
    };

    let value = value.trim();
    if value.is_empty() { None } else { Some(value) }
}

/// Parse a tag value as a decimal, keeping `default` when absent or malformed
#[must_use]
pub fn parse_number(value: Option<&str>, default: f64) -> Parsed<f64> {
    match value.filter(|s| !s.is_empty()).map(str::parse::<f64>) {
        Some(Ok(v)) => Parsed::Value(v),
        _ => Parsed::Defaulted(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use dicom::dictionary_std::tags;

    const META: &str = "0002,0002  Media Storage SOP Class UID: 1.2.840.10008.5.1.4.1.1.2\n\
                        0008,0016  SOP Class UID:  1.2.840.10008.5.1.4.1.1.2 \n\
                        0008,1090  Manufacturer's Model Name: INFINIA\n\
                        0028,1050  Window Center: 40\n\
                        0028,1051  no separator here\n\
                        0028,1052  Rescale Intercept: \n\
                        0028,1053  Rescale Slope: 2.0";

    #[test]
    fn test_tag_key_format() {
        assert_eq!(tag_key(tags::SOP_CLASS_UID), "0008,0016");
        assert_eq!(tag_key(tags::RESCALE_SLOPE), "0028,1053");
        assert_eq!(tag_key(tags::PATIENT_NAME), "0010,0010");
    }

    #[test]
    fn test_value_after_separator_is_trimmed() {
        assert_eq!(
            get_tag_value(META, "0008,0016"),
            Some("1.2.840.10008.5.1.4.1.1.2")
        );
        assert_eq!(get_tag_value(META, "0008,1090"), Some("INFINIA"));
        assert_eq!(get_tag_value(META, "0028,1050"), Some("40"));
    }

    #[test]
    fn test_first_occurrence_wins() {
        let meta = "0028,1050  Window Center: 40\n0028,1050  Window Center: 80\n";
        assert_eq!(get_tag_value(meta, "0028,1050"), Some("40"));
    }

    #[test]
    fn test_missing_key_is_absent() {
        assert_eq!(get_tag_value(META, "0010,0010"), None);
        assert_eq!(get_tag_value("", "0008,0016"), None);
    }

    #[test]
    fn test_key_on_unterminated_last_line_is_absent() {
        assert_eq!(get_tag_value(META, "0028,1053"), None);
    }

    #[test]
    fn test_empty_value_is_absent() {
        assert_eq!(get_tag_value(META, "0028,1052"), None);
    }

    #[test]
    fn test_line_without_separator_returns_raw_text() {
        assert_eq!(
            get_tag_value(META, "0028,1051"),
            Some("0028,1051  no separator here")
        );
    }

    #[test]
    fn test_key_matches_inside_other_text() {
        // Substring search also hits keys embedded in values
        let meta = "0008,0018  SOP Instance UID: 0028,1050\n";
        assert_eq!(get_tag_value(meta, "0028,1050"), Some("0028,1050"));
    }

    #[test]
    fn test_parse_number_outcomes() {
        assert_matches!(parse_number(Some("-1024"), 0.0), Parsed::Value(v) if v == -1024.0);
        assert_matches!(parse_number(Some("2.5"), 1.0), Parsed::Value(v) if v == 2.5);
        assert_matches!(parse_number(Some("40\\400"), 56.0), Parsed::Defaulted(v) if v == 56.0);
        assert_matches!(parse_number(Some(""), 1.0), Parsed::Defaulted(v) if v == 1.0);
        assert_matches!(parse_number(None, 340.0), Parsed::Defaulted(v) if v == 340.0);
    }
}
