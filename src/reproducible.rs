//! Makes PDF bytes a pure function of the page content.
//!
//! printpdf stamps every document with the wall-clock time and random
//! document/instance IDs (in the trailer and the XMP packet), and writes
//! image XObjects in hash-map order. This pass pins the Info dates, drops the
//! XMP packet, puts image resources in name order, and derives the trailer
//! `/ID` from an MD5 of the remaining bytes.

use lopdf::{Dictionary, Document, Object, ObjectId, StringFormat};
use std::collections::BTreeMap;

pub const PINNED_DATE: &str = "D:20000101000000Z";

pub fn normalize(raw: &[u8]) -> lopdf::Result<Vec<u8>> {
    let mut doc = Document::load_mem(raw)?;

    strip_xmp_metadata(&mut doc)?;
    pin_info_dates(&mut doc)?;
    order_image_resources(&mut doc)?;
    doc.prune_objects();

    doc.trailer.remove(b"ID");
    let unstamped = save(&mut doc)?;

    let digest = md5::compute(&unstamped);
    let id = Object::String(digest.0.to_vec(), StringFormat::Hexadecimal);
    doc.trailer.set("ID", Object::Array(vec![id.clone(), id]));

    save(&mut doc)
}

fn strip_xmp_metadata(doc: &mut Document) -> lopdf::Result<()> {
    let root = doc.trailer.get(b"Root")?.as_reference()?;
    doc.get_object_mut(root)?.as_dict_mut()?.remove(b"Metadata");
    Ok(())
}

fn pin_info_dates(doc: &mut Document) -> lopdf::Result<()> {
    let info = match doc.trailer.get(b"Info").and_then(Object::as_reference) {
        Ok(id) => id,
        Err(_) => return Ok(()),
    };

    let dict = doc.get_object_mut(info)?.as_dict_mut()?;
    for key in ["CreationDate", "ModDate"] {
        if dict.has(key.as_bytes()) {
            dict.set(key, Object::string_literal(PINNED_DATE));
        }
    }
    Ok(())
}

/// Sorts each page's `/XObject` entries by name and moves the referenced
/// streams so that names and object numbers ascend together. Image names come
/// from the order images were placed, so this fixes both the dictionary
/// layout and the object numbering.
fn order_image_resources(doc: &mut Document) -> lopdf::Result<()> {
    let pages: Vec<ObjectId> = doc.get_pages().into_values().collect();
    let mut moves = BTreeMap::new();

    for page_id in pages {
        let Some(xobjects) = xobjects_mut(doc, page_id)? else {
            continue;
        };

        let mut entries: Vec<(Vec<u8>, Object)> = xobjects
            .iter()
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let mut slots: Vec<ObjectId> = entries
            .iter()
            .filter_map(|(_, value)| value.as_reference().ok())
            .collect();
        slots.sort_unstable();
        let mut slots = slots.into_iter();

        let mut ordered = Dictionary::new();
        for (name, value) in entries {
            let value = match value {
                Object::Reference(old) => {
                    let new = slots.next().unwrap_or(old);
                    moves.insert(old, new);
                    Object::Reference(new)
                }
                other => other,
            };
            ordered.set(name, value);
        }
        *xobjects = ordered;
    }

    let moved: Vec<(ObjectId, Object)> = moves
        .iter()
        .filter(|(old, new)| old != new)
        .filter_map(|(old, new)| doc.objects.get(old).map(|object| (*new, object.clone())))
        .collect();
    doc.objects.extend(moved);
    Ok(())
}

fn xobjects_mut(doc: &mut Document, page_id: ObjectId) -> lopdf::Result<Option<&mut Dictionary>> {
    let page = doc.get_dictionary(page_id)?;
    let (resources, resources_id) = match page.get(b"Resources") {
        Ok(Object::Reference(id)) => (doc.get_dictionary(*id)?, Some(*id)),
        Ok(object) => (object.as_dict()?, None),
        Err(_) => return Ok(None),
    };
    let xobject_id = match resources.get(b"XObject") {
        Ok(Object::Reference(id)) => Some(*id),
        Ok(_) => None,
        Err(_) => return Ok(None),
    };

    if let Some(id) = xobject_id {
        return doc.get_dictionary_mut(id).map(Some);
    }
    let resources = match resources_id {
        Some(id) => doc.get_dictionary_mut(id)?,
        None => doc
            .get_dictionary_mut(page_id)?
            .get_mut(b"Resources")?
            .as_dict_mut()?,
    };
    resources.get_mut(b"XObject")?.as_dict_mut().map(Some)
}

fn save(doc: &mut Document) -> lopdf::Result<Vec<u8>> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)?;
    Ok(buffer)
}
