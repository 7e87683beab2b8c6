use std::borrow::Cow;
use std::collections::HashSet;
use std::io::Cursor;

use anyhow::{Context, Result};
use log::warn;
use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;

use crate::audio_probe::AudioProbe;

// @module: Package document (content.opf) editing

/// The additions a read-along build makes to the package document
#[derive(Debug)]
pub struct OpfEdit<'a> {
    // @field: Selected content document stems, ascending
    pub stems: &'a [String],

    // @field: Narration audio filename
    pub audio_file: &'a str,

    // @field: Media type of the narration audio
    pub audio_media_type: &'a str,

    // @field: Total narration duration in seconds
    pub duration_seconds: u64,

    // @field: CSS class applied to the active word by reading systems
    pub active_class: &'a str,
}

/// Streaming rewrite of the package document.
///
/// Injects the media-overlay metadata, one manifest item per overlay
/// document, the audio manifest item, and a `media-overlay` reference on
/// each selected text document's existing manifest item. Everything else
/// passes through untouched.
pub struct OpfEditor;

impl OpfEditor {
    /// Rewrite a package document with the read-along additions
    pub fn edit(opf_source: &str, edit: &OpfEdit) -> Result<String> {
        let mut reader = Reader::from_str(opf_source);
        reader.config_mut().trim_text(false);

        let mut buffer = Vec::new();
        let mut writer = Writer::new(Cursor::new(&mut buffer));
        let mut marked: HashSet<&str> = HashSet::new();

        loop {
            let event = reader
                .read_event()
                .context("Malformed XML in package document")?;

            match event {
                Event::Start(ref start) if start.local_name().as_ref() == b"manifest" => {
                    writer.write_event(Event::Start(start.to_owned()))?;
                    Self::write_overlay_items(&mut writer, edit)?;
                }
                Event::End(ref end) if end.local_name().as_ref() == b"manifest" => {
                    Self::write_audio_item(&mut writer, edit)?;
                    writer.write_event(Event::End(end.to_owned()))?;
                }
                Event::End(ref end) if end.local_name().as_ref() == b"metadata" => {
                    Self::write_media_metadata(&mut writer, edit)?;
                    writer.write_event(Event::End(end.to_owned()))?;
                }
                Event::Start(ref start) if start.local_name().as_ref() == b"item" => {
                    let rewritten = Self::mark_text_item(start, edit, &mut marked)?;
                    writer.write_event(Event::Start(rewritten))?;
                }
                Event::Empty(ref start) if start.local_name().as_ref() == b"item" => {
                    let rewritten = Self::mark_text_item(start, edit, &mut marked)?;
                    writer.write_event(Event::Empty(rewritten))?;
                }
                Event::Eof => break,
                other => writer.write_event(other)?,
            }
        }

        for stem in edit.stems {
            if !marked.contains(stem.as_str()) {
                warn!("Package manifest has no item with id '{}'; its overlay is not referenced", stem);
            }
        }

        String::from_utf8(buffer).context("Edited package document is not valid UTF-8")
    }

    /// One manifest item per overlay document, in ascending stem order
    fn write_overlay_items<W: std::io::Write>(
        writer: &mut Writer<W>,
        edit: &OpfEdit,
    ) -> Result<()> {
        for stem in edit.stems {
            let mut item = BytesStart::new("item");
            item.push_attribute(("media-type", "application/smil+xml"));
            item.push_attribute(("id", format!("smil_{stem}").as_str()));
            item.push_attribute(("href", format!("smil/{stem}.smil").as_str()));
            writer.write_event(Event::Empty(item))?;
        }
        Ok(())
    }

    /// The narration audio manifest item
    fn write_audio_item<W: std::io::Write>(writer: &mut Writer<W>, edit: &OpfEdit) -> Result<()> {
        let mut item = BytesStart::new("item");
        item.push_attribute(("id", "audio1"));
        item.push_attribute(("href", format!("audio/{}", edit.audio_file).as_str()));
        item.push_attribute(("media-type", edit.audio_media_type));
        writer.write_event(Event::Empty(item))?;
        Ok(())
    }

    /// `media:duration` and `media:active-class` metadata entries
    fn write_media_metadata<W: std::io::Write>(
        writer: &mut Writer<W>,
        edit: &OpfEdit,
    ) -> Result<()> {
        let mut duration = BytesStart::new("meta");
        duration.push_attribute(("property", "media:duration"));
        writer.write_event(Event::Start(duration))?;
        writer.write_event(Event::Text(BytesText::new(
            &AudioProbe::format_clock(edit.duration_seconds),
        )))?;
        writer.write_event(Event::End(BytesEnd::new("meta")))?;

        let mut active_class = BytesStart::new("meta");
        active_class.push_attribute(("property", "media:active-class"));
        writer.write_event(Event::Start(active_class))?;
        writer.write_event(Event::Text(BytesText::new(edit.active_class)))?;
        writer.write_event(Event::End(BytesEnd::new("meta")))?;
        Ok(())
    }

    /// Re-emit a manifest item, adding the `media-overlay` reference when
    /// its id matches a selected content document
    fn mark_text_item<'s>(
        start: &BytesStart,
        edit: &'s OpfEdit,
        marked: &mut HashSet<&'s str>,
    ) -> Result<BytesStart<'static>> {
        let name = String::from_utf8(start.name().as_ref().to_vec())?;
        let mut rewritten = BytesStart::new(name);

        let mut matched_stem: Option<&str> = None;
        for attr in start.attributes().with_checks(false) {
            let attr = attr.context("Malformed attribute in package document")?;
            if attr.key.as_ref() == b"id" {
                let id = String::from_utf8(attr.value.to_vec())?;
                matched_stem = edit.stems.iter().map(String::as_str).find(|s| *s == id);
            }
            rewritten.push_attribute(Attribute {
                key: QName(attr.key.as_ref()),
                value: Cow::Owned(attr.value.into_owned()),
            });
        }

        if let Some(stem) = matched_stem {
            rewritten.push_attribute(("media-overlay", format!("smil_{stem}").as_str()));
            marked.insert(stem);
        }

        Ok(rewritten.into_owned())
    }
}
