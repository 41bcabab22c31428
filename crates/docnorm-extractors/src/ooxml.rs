//! Helpers for reading parts out of Office Open XML packages.

use std::io::{Read, Seek};

use docnorm_core::{DocnormError, DocnormResult};
use quick_xml::events::BytesStart;

/// Read one part of a package as UTF-8 text.
pub(crate) fn read_part<R: Read + Seek>(
    archive: &mut zip::ZipArchive<R>,
    format: &str,
    name: &str,
) -> DocnormResult<String> {
    let mut part = archive
        .by_name(name)
        .map_err(|e| DocnormError::parse(format, format!("missing part '{}': {}", name, e)))?;
    let mut xml = String::new();
    part.read_to_string(&mut xml)?;
    Ok(xml)
}

/// Unescaped value of an unprefixed attribute.
pub(crate) fn attribute(
    element: &BytesStart,
    format: &str,
    key: &[u8],
) -> DocnormResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| DocnormError::parse(format, format!("attribute: {}", e)))?;
        if attr.key.as_ref() == key {
            let value = attr
                .unescape_value()
                .map_err(|e| DocnormError::parse(format, format!("attribute: {}", e)))?;
            return Ok(Some(value.into_owned()));
        }
    }
    Ok(None)
}
