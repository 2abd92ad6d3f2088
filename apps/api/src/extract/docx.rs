//! DOCX text extraction: reads `word/document.xml` out of the OOXML zip container.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;
use zip::ZipArchive;

use super::ExtractError;

const DOCUMENT_PART: &str = "word/document.xml";

/// Cap on the decompressed size of `word/document.xml`.
const MAX_DOCUMENT_XML_BYTES: u64 = 32 * 1024 * 1024;

pub(super) fn extract_docx(content: &[u8]) -> Result<String, ExtractError> {
    read_docx(content, MAX_DOCUMENT_XML_BYTES)
}

fn read_docx(content: &[u8], xml_limit: u64) -> Result<String, ExtractError> {
    let mut archive = ZipArchive::new(Cursor::new(content)).map_err(ExtractError::unparsable)?;
    let part = archive
        .by_name(DOCUMENT_PART)
        .map_err(ExtractError::unparsable)?;

    // Read one byte past the limit to tell "exactly at" from "over".
    let mut raw = Vec::new();
    part.take(xml_limit + 1)
        .read_to_end(&mut raw)
        .map_err(ExtractError::unparsable)?;
    if raw.len() as u64 > xml_limit {
        return Err(ExtractError::unparsable(format!(
            "{DOCUMENT_PART} inflates past {xml_limit} bytes"
        )));
    }

    let xml = String::from_utf8(raw).map_err(ExtractError::unparsable)?;
    document_xml_to_text(&xml)
}

/// Collects the text runs (`w:t`) of a WordprocessingML body.
/// Paragraph ends and breaks become newlines, tabs become tab characters.
fn document_xml_to_text(xml: &str) -> Result<String, ExtractError> {
    let mut reader = Reader::from_str(xml);
    let mut out = String::new();
    let mut in_text_run = false;

    loop {
        match reader.read_event().map_err(ExtractError::unparsable)? {
            Event::Start(e) if e.local_name().as_ref() == b"t" => in_text_run = true,
            Event::End(e) => match e.local_name().as_ref() {
                b"t" => in_text_run = false,
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.local_name().as_ref() {
                b"br" | b"cr" => out.push('\n'),
                b"tab" => out.push('\t'),
                b"p" => out.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_text_run => {
                out.push_str(&t.unescape().map_err(ExtractError::unparsable)?);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use zip::write::FileOptions;
    use zip::ZipWriter;

    use super::*;

    const BODY: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Jane Doe</w:t></w:r></w:p>
    <w:p><w:r><w:t xml:space="preserve">Skills: </w:t></w:r><w:r><w:t>Rust &amp; Go</w:t></w:r></w:p>
    <w:p><w:r><w:t>Line one</w:t><w:br/><w:t>Line two</w:t></w:r></w:p>
    <w:p><w:r><w:t>Name</w:t><w:tab/><w:t>Value</w:t></w:r></w:p>
  </w:body>
</w:document>"#;

    fn build_docx(parts: &[(&str, &str)]) -> Vec<u8> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, body) in parts {
            writer.start_file(*name, FileOptions::default()).unwrap();
            writer.write_all(body.as_bytes()).unwrap();
        }
        writer.finish().unwrap().into_inner()
    }

    #[test]
    fn test_paragraphs_become_lines() {
        let text = extract_docx(&build_docx(&[(DOCUMENT_PART, BODY)])).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines,
            vec!["Jane Doe", "Skills: Rust & Go", "Line one", "Line two", "Name\tValue"]
        );
    }

    #[test]
    fn test_whitespace_between_tags_is_ignored() {
        let text = document_xml_to_text(BODY).unwrap();
        assert!(!text.contains("  "), "layout whitespace leaked: {text:?}");
    }

    #[test]
    fn test_missing_document_part_is_unparsable() {
        let bytes = build_docx(&[("word/styles.xml", "<w:styles/>")]);
        let err = extract_docx(&bytes).unwrap_err();
        assert!(matches!(err, ExtractError::Unparsable(_)));
    }

    #[test]
    fn test_oversized_document_part_is_unparsable() {
        let bytes = build_docx(&[(DOCUMENT_PART, BODY)]);

        let err = read_docx(&bytes, 64).unwrap_err();
        assert!(matches!(&err, ExtractError::Unparsable(msg) if msg.contains("inflates past 64")));

        let limit = BODY.len() as u64;
        assert!(read_docx(&bytes, limit).is_ok());
    }

    #[test]
    fn test_malformed_xml_is_unparsable() {
        let bytes = build_docx(&[(DOCUMENT_PART, "<w:document><w:body></w:document>")]);
        assert!(extract_docx(&bytes).is_err());
    }
}
