//! Per-file document outline built on top of `lopdf`.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use thiserror::Error;

/// Errors that can occur while embedding the outline into a rendered document.
#[derive(Debug, Error)]
pub enum OutlineError {
    /// A required catalog entry was missing from the document trailer.
    #[error("PDF catalog entry is missing")]
    MissingCatalog,
    /// The catalog object was not a dictionary, preventing outline injection.
    #[error("PDF catalog entry is not a dictionary")]
    InvalidCatalog,
    /// A referenced page number did not exist in the rendered document.
    #[error("file {file_index} refers to missing page {page_number} for its outline entry")]
    MissingPage {
        /// Index of the file whose page reference is missing.
        file_index: usize,
        /// The requested (1-indexed) page number that could not be resolved.
        page_number: usize,
    },
}

/// One outline entry: a title and the 1-based page it points at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineItem {
    pub title: String,
    pub page: usize,
}

/// Adds a flat outline with one entry per item, each targeting `/Dest [page /Fit]`.
///
/// An outline root already referenced by the catalog is replaced in place. Returns the number
/// of entries written. Nothing is changed when `items` is empty.
pub fn apply_outline(document: &mut Document, items: &[OutlineItem]) -> Result<usize, OutlineError> {
    if items.is_empty() {
        return Ok(0);
    }

    let pages = document.get_pages();
    let mut entries = collect_outline_entries(document, items, &pages)?;

    let outlines_id =
        existing_outlines_root(document).unwrap_or_else(|| document.new_object_id());
    link_outline_entries(outlines_id, document, &mut entries);
    insert_outlines_root(outlines_id, document, &entries)?;

    Ok(entries.len())
}

fn existing_outlines_root(document: &Document) -> Option<ObjectId> {
    document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .and_then(|catalog_id| document.get_object(catalog_id))
        .and_then(Object::as_dict)
        .and_then(|catalog| catalog.get(b"Outlines"))
        .and_then(Object::as_reference)
        .ok()
        .filter(|id| document.objects.contains_key(id))
}

struct OutlineEntry {
    object_id: ObjectId,
    page_ref: ObjectId,
    title: String,
}

fn collect_outline_entries(
    document: &mut Document,
    items: &[OutlineItem],
    pages: &BTreeMap<u32, ObjectId>,
) -> Result<Vec<OutlineEntry>, OutlineError> {
    let mut entries = Vec::with_capacity(items.len());

    for (index, item) in items.iter().enumerate() {
        let page_ref = u32::try_from(item.page)
            .ok()
            .and_then(|page| pages.get(&page).copied())
            .ok_or(OutlineError::MissingPage {
                file_index: index,
                page_number: item.page,
            })?;

        entries.push(OutlineEntry {
            object_id: document.new_object_id(),
            page_ref,
            title: item.title.clone(),
        });
    }

    Ok(entries)
}

fn link_outline_entries(outlines_id: ObjectId, document: &mut Document, entries: &mut [OutlineEntry]) {
    for index in 0..entries.len() {
        let mut dictionary = Dictionary::new();
        dictionary.set("Title", text_string(&entries[index].title));
        dictionary.set(
            "Dest",
            Object::Array(vec![
                Object::Reference(entries[index].page_ref),
                Object::Name("Fit".into()),
            ]),
        );
        dictionary.set("Parent", Object::Reference(outlines_id));

        if index > 0 {
            dictionary.set("Prev", Object::Reference(entries[index - 1].object_id));
        }

        if index + 1 < entries.len() {
            dictionary.set("Next", Object::Reference(entries[index + 1].object_id));
        }

        document
            .objects
            .insert(entries[index].object_id, Object::Dictionary(dictionary));
    }
}

fn insert_outlines_root(
    outlines_id: ObjectId,
    document: &mut Document,
    entries: &[OutlineEntry],
) -> Result<(), OutlineError> {
    let catalog_id = document
        .trailer
        .get(b"Root")
        .and_then(Object::as_reference)
        .map_err(|_| OutlineError::MissingCatalog)?;

    let mut dictionary = Dictionary::new();
    dictionary.set("Type", Object::Name("Outlines".into()));
    dictionary.set("Count", Object::Integer(entries.len() as i64));
    if let Some(first) = entries.first() {
        dictionary.set("First", Object::Reference(first.object_id));
    }
    if let Some(last) = entries.last() {
        dictionary.set("Last", Object::Reference(last.object_id));
    }

    let catalog = document
        .objects
        .get_mut(&catalog_id)
        .ok_or(OutlineError::MissingCatalog)?
        .as_dict_mut()
        .map_err(|_| OutlineError::InvalidCatalog)?;
    catalog.set("Outlines", Object::Reference(outlines_id));
    catalog.set("PageMode", Object::Name("UseOutlines".into()));

    document
        .objects
        .insert(outlines_id, Object::Dictionary(dictionary));

    Ok(())
}

/// PDF text string: a literal for ASCII, UTF-16BE with byte order mark otherwise.
fn text_string(text: &str) -> Object {
    if text.is_ascii() {
        return Object::string_literal(text);
    }

    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}
