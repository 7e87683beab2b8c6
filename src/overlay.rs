use std::io::Cursor;

use anyhow::{Context, Result};
use quick_xml::Writer;

// @module: Media overlay document model and SMIL serialization

/// One aligned word: the audio-side half of a word unit, joined to the
/// text-side span by the shared integer id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncPoint {
    // @field: Global word id shared with the text span
    pub word_id: usize,

    // @field: Fragment reference into the content document
    pub text_ref: String,

    // @field: Clip start in seconds, verbatim from the timing source
    pub clip_begin: String,

    // @field: Clip end in seconds, verbatim from the timing source
    pub clip_end: String,
}

impl SyncPoint {
    /// The overlay `par` element id for this point
    pub fn par_id(&self) -> String {
        format!("par{}", self.word_id)
    }
}

/// A per-document overlay: an ordered sequence of sync points referencing
/// one shared audio resource.
///
/// Created empty, populated in lockstep with word creation, serialized once
/// and then discarded - there is no further mutation after serialization.
#[derive(Debug, Clone)]
pub struct OverlayDocument {
    // @field: Stem of the content document this overlay covers
    pub stem: String,

    // @field: Shared audio resource filename
    pub audio_file: String,

    // @field: Ordered sync points, one per word
    pub points: Vec<SyncPoint>,
}

impl OverlayDocument {
    /// Create an empty overlay for a content document
    pub fn new(stem: &str, audio_file: &str) -> Self {
        OverlayDocument {
            stem: stem.to_string(),
            audio_file: audio_file.to_string(),
            points: Vec::new(),
        }
    }

    /// The overlay's own filename inside the package
    pub fn file_name(&self) -> String {
        format!("{}.smil", self.stem)
    }

    /// Serialize to a SMIL media overlay document.
    ///
    /// Fixed shape: `smil` root holding a `body` with one `par` per sync
    /// point, each `par` holding an empty `text` and `audio` element.
    pub fn to_smil_string(&self) -> Result<String> {
        let mut buffer = Vec::new();
        let mut writer = Writer::new_with_indent(Cursor::new(&mut buffer), b' ', 2);

        writer
            .create_element("smil")
            .with_attribute(("xmlns", "http://www.w3.org/ns/SMIL"))
            .with_attribute(("xmlns:epub", "http://www.idpf.org/2007/ops"))
            .with_attribute(("version", "3.0"))
            .write_inner_content(|writer| {
                let body = writer.create_element("body");
                if self.points.is_empty() {
                    body.write_empty()?;
                    return Ok(());
                }
                body.write_inner_content(|writer| {
                    for point in &self.points {
                        writer
                            .create_element("par")
                            .with_attribute(("id", point.par_id().as_str()))
                            .write_inner_content(|writer| {
                                writer
                                    .create_element("text")
                                    .with_attribute(("src", point.text_ref.as_str()))
                                    .write_empty()?;
                                writer
                                    .create_element("audio")
                                    .with_attribute((
                                        "src",
                                        format!("../audio/{}", self.audio_file).as_str(),
                                    ))
                                    .with_attribute((
                                        "clipBegin",
                                        format!("{}s", point.clip_begin).as_str(),
                                    ))
                                    .with_attribute((
                                        "clipEnd",
                                        format!("{}s", point.clip_end).as_str(),
                                    ))
                                    .write_empty()?;
                                Ok(())
                            })?;
                    }
                    Ok(())
                })?;
                Ok(())
            })?;

        String::from_utf8(buffer).context("Serialized overlay is not valid UTF-8")
    }
}
