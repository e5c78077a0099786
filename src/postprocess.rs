//! Final pass over rendered bytes: outline injection and content-stream compression.

use std::path::Path;

use log::warn;
use lopdf::{Document, Object};

use crate::error::Error;
use crate::outline::{self, OutlineItem};

/// Re-serializes the rendered `bytes` with compressed page contents and the given outline.
pub fn finalize(bytes: &[u8], outline: &[OutlineItem], path: &Path) -> Result<Vec<u8>, Error> {
    let mut document = Document::load_mem(bytes).map_err(|source| Error::Pdf {
        path: path.to_path_buf(),
        source,
    })?;

    outline::apply_outline(&mut document, outline).map_err(|source| Error::Outline {
        path: path.to_path_buf(),
        source,
    })?;
    compress_page_contents(&mut document);

    let mut buffer = Vec::with_capacity(bytes.len());
    document
        .save_to(&mut buffer)
        .map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })?;
    Ok(buffer)
}

/// Flate-compresses every page content stream that has no filter yet.
///
/// Returns the number of streams inspected. Streams whose compressed form would not be
/// smaller are left as they are.
pub fn compress_page_contents(document: &mut Document) -> usize {
    let content_ids: Vec<_> = document
        .get_pages()
        .into_values()
        .flat_map(|page_id| document.get_page_contents(page_id))
        .collect();

    let mut inspected = 0;
    for id in content_ids {
        if let Some(Object::Stream(stream)) = document.objects.get_mut(&id) {
            if let Err(err) = stream.compress() {
                warn!("Leaving content stream {:?} uncompressed: {}", id, err);
            }
            inspected += 1;
        }
    }
    inspected
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::{dictionary, Stream};

    fn single_page_document(content: Vec<u8>) -> Document {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();
        let content_id = document.add_object(Stream::new(dictionary! {}, content));
        let page_id = document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![Object::Reference(page_id)],
                "Count" => 1,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);
        document
    }

    fn first_content_stream(document: &Document) -> &lopdf::Stream {
        let page_id = *document.get_pages().values().next().expect("one page");
        let content_id = document.get_page_contents(page_id)[0];
        document
            .get_object(content_id)
            .and_then(Object::as_stream)
            .expect("content stream")
    }

    #[test]
    fn page_content_is_flate_compressed() {
        let content = b"BT /F1 7 Tf 10 10 Td (Page 1) Tj ET\n".repeat(40);
        let mut document = single_page_document(content.clone());

        assert_eq!(compress_page_contents(&mut document), 1);

        let stream = first_content_stream(&document);
        assert_eq!(
            stream.dict.get(b"Filter").and_then(Object::as_name_str).ok(),
            Some("FlateDecode")
        );
        assert!(stream.content.len() < content.len());
        assert_eq!(stream.decompressed_content().expect("inflate"), content);
    }

    #[test]
    fn finalize_round_trips_through_bytes() {
        let content = b"BT ET\n".repeat(50);
        let mut document = single_page_document(content);
        let mut bytes = Vec::new();
        document.save_to(&mut bytes).expect("save");

        let items = vec![OutlineItem {
            title: "only.txt".to_owned(),
            page: 1,
        }];
        let finalized = finalize(&bytes, &items, Path::new("out.pdf")).expect("finalize");

        let reloaded = Document::load_mem(&finalized).expect("reload");
        let stream = first_content_stream(&reloaded);
        assert!(stream.dict.get(b"Filter").is_ok());
        assert_eq!(reloaded.get_pages().len(), 1);
    }

    #[test]
    fn garbage_bytes_are_a_pdf_error() {
        let err = finalize(b"not a pdf", &[], Path::new("broken.pdf")).unwrap_err();
        assert!(matches!(err, Error::Pdf { .. }));
    }
}
