//! Writing rehearsal marks into a Live set as arrangement locators.

use crate::document::{Document, NodeId};
use crate::error::{Error, Result};
use crate::notation::MarkerRecord;

/// Element holding the whole Live set.
pub const LIVE_SET: &str = "LiveSet";

/// The locator section is inserted right after this element.
pub const ANCHOR: &str = "ViewStateSessionMixerHeight";

/// Name of both the locator section and the list nested inside it.
pub const LOCATORS: &str = "Locators";

/// Beats per bar. Assumes 4/4 throughout; time signatures in the score are
/// not read.
pub const BEATS_PER_BAR: u32 = 4;

/// Arrangement position, in beats, of the first beat of `bar`.
///
/// `None` when the position does not fit in a `u32`.
#[must_use]
pub const fn locator_time(bar: u32) -> Option<u32> {
    bar.saturating_sub(1).checked_mul(BEATS_PER_BAR)
}

/// One arrangement locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Locator {
    pub id: u32,
    pub time: u32,
    pub name: String,
}

impl Locator {
    /// Locators for `markers`, numbered from 1 in input order.
    ///
    /// Fails with [`Error::InvalidBar`] for a bar whose position overflows.
    pub fn from_markers(markers: &[MarkerRecord]) -> Result<Vec<Self>> {
        (1..)
            .zip(markers)
            .map(|(id, marker)| -> Result<Self> {
                let time = locator_time(marker.bar).ok_or_else(|| Error::InvalidBar {
                    value: marker.bar.to_string(),
                })?;
                Ok(Self {
                    id,
                    time,
                    name: marker.label.clone(),
                })
            })
            .collect()
    }

    fn append_to(&self, doc: &mut Document, list: NodeId) {
        let locator = doc.append_child(list, "Locator");
        doc.set_attribute(locator, "Id", self.id.to_string());

        let values = [
            ("LomId", String::from("0")),
            ("Time", self.time.to_string()),
            ("Name", self.name.clone()),
            ("Annotation", String::new()),
            ("IsSongStart", String::from("false")),
        ];
        for (name, value) in values {
            let field = doc.append_child(locator, name);
            doc.set_attribute(field, "Value", value);
        }
    }
}

/// Replace the locator section of `doc` with one locator per marker.
///
/// Any existing section is dropped rather than merged. Returns the number
/// of locators written. On error the document is left unchanged.
pub fn apply(doc: &mut Document, markers: &[MarkerRecord]) -> Result<usize> {
    if markers.is_empty() {
        return Err(Error::EmptyInput);
    }

    let live_set = doc
        .find_child(doc.root(), LIVE_SET)
        .ok_or_else(|| Error::structure(LIVE_SET))?;
    if doc.position(live_set, ANCHOR).is_none() {
        return Err(Error::structure(ANCHOR));
    }
    let locators = Locator::from_markers(markers)?;

    if let Some(stale) = doc.find_child(live_set, LOCATORS) {
        doc.remove_child(live_set, stale);
        log::debug!("Removed existing locator section");
    }

    let anchor = doc
        .position(live_set, ANCHOR)
        .ok_or_else(|| Error::structure(ANCHOR))?;
    let section = doc.insert_child(live_set, anchor + 1, LOCATORS);
    let list = doc.append_child(section, LOCATORS);

    for locator in &locators {
        log::debug!(
            "Locator {} at beat {}: {:?}",
            locator.id,
            locator.time,
            locator.name
        );
        locator.append_to(doc, list);
    }

    Ok(locators.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live_set(children: &[&str]) -> (Document, NodeId) {
        let mut doc = Document::new("Ableton");
        let live_set = doc.append_child(doc.root(), LIVE_SET);
        for name in children {
            doc.append_child(live_set, *name);
        }
        (doc, live_set)
    }

    fn row(id: &str, time: &str, name: &str) -> (String, String, String) {
        (id.to_string(), time.to_string(), name.to_string())
    }

    fn locator_list(doc: &Document, live_set: NodeId) -> Vec<(String, String, String)> {
        let section = doc.find_child(live_set, LOCATORS).unwrap();
        let list = doc.find_child(section, LOCATORS).unwrap();
        doc[list]
            .children()
            .iter()
            .map(|&locator| {
                let value = |name: &str| {
                    let field = doc.find_child(locator, name).unwrap();
                    doc[field].attribute("Value").unwrap().to_string()
                };
                (
                    doc[locator].attribute("Id").unwrap().to_string(),
                    value("Time"),
                    value("Name"),
                )
            })
            .collect()
    }

    #[test]
    fn test_locator_time() {
        assert_eq!(locator_time(1), Some(0));
        assert_eq!(locator_time(3), Some(8));
        assert_eq!(locator_time(5), Some(16));
    }

    #[test]
    fn test_locator_time_overflow() {
        let last_bar = u32::MAX / BEATS_PER_BAR + 1;
        assert_eq!(locator_time(last_bar), Some(u32::MAX - 3));
        assert_eq!(locator_time(last_bar + 1), None);
        assert_eq!(locator_time(1_100_000_000), None);
    }

    #[test]
    fn test_huge_measure_number_is_rejected_before_splicing() {
        let markers = crate::notation::extract_from_str(
            r#"<score-partwise><part><measure number="1100000000"><direction><direction-type><rehearsal>Coda</rehearsal></direction-type></direction></measure></part></score-partwise>"#,
        )
        .unwrap();
        let (mut doc, live_set) = live_set(&[ANCHOR, LOCATORS]);
        let before = doc.clone();

        let result = apply(&mut doc, &markers);

        assert!(matches!(result, Err(Error::InvalidBar { value }) if value == "1100000000"));
        assert!(doc.same_subtree(doc.root(), &before, before.root()));
        assert_eq!(doc.child_names(live_set), vec![ANCHOR, LOCATORS]);
    }

    #[test]
    fn test_from_markers_numbers_from_one() {
        let markers = vec![MarkerRecord::new(1, "Intro"), MarkerRecord::new(9, "Verse")];
        let locators = Locator::from_markers(&markers).unwrap();
        assert_eq!(
            locators,
            vec![
                Locator {
                    id: 1,
                    time: 0,
                    name: String::from("Intro")
                },
                Locator {
                    id: 2,
                    time: 32,
                    name: String::from("Verse")
                },
            ]
        );
    }

    #[test]
    fn test_apply_inserts_after_anchor() {
        let (mut doc, live_set) = live_set(&["Tracks", ANCHOR, "SomeOtherNode"]);
        let count = apply(&mut doc, &[MarkerRecord::new(3, "Chorus")]).unwrap();

        assert_eq!(count, 1);
        assert_eq!(
            doc.child_names(live_set),
            vec!["Tracks", ANCHOR, LOCATORS, "SomeOtherNode"]
        );
        assert_eq!(
            locator_list(&doc, live_set),
            vec![row("1", "8", "Chorus")]
        );
    }

    #[test]
    fn test_locator_fields() {
        let (mut doc, live_set) = live_set(&[ANCHOR]);
        apply(&mut doc, &[MarkerRecord::new(2, "Riff")]).unwrap();

        let section = doc.find_child(live_set, LOCATORS).unwrap();
        let list = doc.find_child(section, LOCATORS).unwrap();
        let locator = doc[list].children()[0];
        assert_eq!(
            doc.child_names(locator),
            vec!["LomId", "Time", "Name", "Annotation", "IsSongStart"]
        );
        let value = |name: &str| {
            let field = doc.find_child(locator, name).unwrap();
            doc[field].attribute("Value").unwrap().to_string()
        };
        assert_eq!(value("LomId"), "0");
        assert_eq!(value("Time"), "4");
        assert_eq!(value("Annotation"), "");
        assert_eq!(value("IsSongStart"), "false");
    }

    #[test]
    fn test_apply_twice_replaces() {
        let (mut doc, live_set) = live_set(&[ANCHOR, "Transport"]);
        apply(
            &mut doc,
            &[MarkerRecord::new(1, "Intro"), MarkerRecord::new(5, "Verse")],
        )
        .unwrap();
        apply(&mut doc, &[MarkerRecord::new(17, "Solo")]).unwrap();

        assert_eq!(doc.child_names(live_set), vec![ANCHOR, LOCATORS, "Transport"]);
        assert_eq!(
            locator_list(&doc, live_set),
            vec![row("1", "64", "Solo")]
        );
    }

    #[test]
    fn test_stale_section_elsewhere_is_moved_after_anchor() {
        let (mut doc, live_set) = live_set(&[LOCATORS, "Tracks", ANCHOR]);
        apply(&mut doc, &[MarkerRecord::new(1, "Intro")]).unwrap();
        assert_eq!(doc.child_names(live_set), vec!["Tracks", ANCHOR, LOCATORS]);
    }

    #[test]
    fn test_empty_markers_leave_document_unchanged() {
        let (mut doc, live_set) = live_set(&[ANCHOR, LOCATORS]);
        let before = doc.clone();

        assert!(matches!(apply(&mut doc, &[]), Err(Error::EmptyInput)));
        assert!(doc.same_subtree(doc.root(), &before, before.root()));
        assert_eq!(doc.child_names(live_set), vec![ANCHOR, LOCATORS]);
    }

    #[test]
    fn test_missing_live_set() {
        let mut doc = Document::new("Ableton");
        let result = apply(&mut doc, &[MarkerRecord::new(1, "Intro")]);
        assert!(matches!(result, Err(Error::Structure { element }) if element == LIVE_SET));
    }

    #[test]
    fn test_missing_anchor_leaves_stale_section() {
        let (mut doc, live_set) = live_set(&["Tracks", LOCATORS]);
        let result = apply(&mut doc, &[MarkerRecord::new(1, "Intro")]);

        assert!(matches!(result, Err(Error::Structure { element }) if element == ANCHOR));
        assert_eq!(doc.child_names(live_set), vec!["Tracks", LOCATORS]);
    }
}
