//! Rendering of a DICOM dataset as an "Info" text dump

use super::tags::tag_key;
use dicom::core::dictionary::DataDictionary;
use dicom::dictionary_std::tags;
use dicom::object::{InMemDicomObject, StandardDataDictionary};
use std::fmt::Write;

/// One `GGGG,EEEE  Alias: value` line per textual element
///
/// Pixel data, sequences and values that cannot be shown as text are skipped.
#[must_use]
pub fn build_info_text(obj: &InMemDicomObject<StandardDataDictionary>) -> String {
    let dict = StandardDataDictionary;
    let mut info = String::new();

    for elem in obj.iter() {
        let tag = elem.header().tag;
        if tag == tags::PIXEL_DATA {
            continue;
        }
        let Ok(value) = elem.value().to_str() else {
            continue;
        };

        let name = dict.by_tag(tag).map_or("---", |entry| entry.alias);

        // Writing to a String cannot fail
        let _ = writeln!(info, "{}  {name}: {}", tag_key(tag), value.trim());
    }

    info
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dicom::tags::get_tag_value;
    use dicom::core::{DataElement, PrimitiveValue, VR};

    fn sample_object() -> InMemDicomObject {
        InMemDicomObject::from_element_iter([
            DataElement::new(
                tags::SOP_CLASS_UID,
                VR::UI,
                PrimitiveValue::from("1.2.840.10008.5.1.4.1.1.2"),
            ),
            DataElement::new(tags::PATIENT_NAME, VR::PN, PrimitiveValue::from("Doe^Jane")),
            DataElement::new(tags::RESCALE_INTERCEPT, VR::DS, PrimitiveValue::from("-1024 ")),
            DataElement::new(tags::ROWS, VR::US, PrimitiveValue::from(2_u16)),
            DataElement::new(
                tags::PIXEL_DATA,
                VR::OW,
                PrimitiveValue::U16(vec![1_u16, 2, 3, 4].into()),
            ),
        ])
    }

    #[test]
    fn test_info_lines_are_readable_by_tag_reader() {
        let info = build_info_text(&sample_object());

        assert_eq!(
            get_tag_value(&info, "0008,0016"),
            Some("1.2.840.10008.5.1.4.1.1.2")
        );
        assert_eq!(get_tag_value(&info, "0010,0010"), Some("Doe^Jane"));
        assert_eq!(get_tag_value(&info, "0028,1052"), Some("-1024"));
        assert_eq!(get_tag_value(&info, "0028,0010"), Some("2"));
    }

    #[test]
    fn test_info_uses_dictionary_alias() {
        let info = build_info_text(&sample_object());
        assert!(info.contains("0008,0016  SOPClassUID: "));
    }

    #[test]
    fn test_pixel_data_is_skipped() {
        let info = build_info_text(&sample_object());
        assert!(!info.contains("7FE0,0010"));
        assert!(info.ends_with('\n'));
    }
}
