use super::{BinEmitter, FormatError};
use crate::structs::options::RunOptions;
use crate::utils::time::format_iso;
use common::windows::{BROKEN_SIZE, BinVersion, RecycleMeta, RecycleRecord};
use log::error;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::io::Cursor;

/// XML report. The writer escapes markup in text content, so escaped
/// path templates pass through without CDATA
pub(crate) struct XmlEmitter {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl XmlEmitter {
    pub(crate) fn new() -> XmlEmitter {
        XmlEmitter {
            writer: Writer::new_with_indent(Cursor::new(Vec::new()), b' ', 2),
        }
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), FormatError> {
        let result = self.writer.write_event(event);
        match result {
            Ok(_) => Ok(()),
            Err(err) => {
                error!("[output] Failed to write XML event: {err:?}");
                Err(FormatError::Xml)
            }
        }
    }
}

impl BinEmitter for XmlEmitter {
    fn header(&mut self, meta: &RecycleMeta, _options: &RunOptions) -> Result<(), FormatError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new("recyclebin");
        root.push_attribute(("format", meta.format.label()));
        if let BinVersion::Known(value) = meta.version {
            root.push_attribute(("version", format!("{value}").as_str()));
        }
        self.write(Event::Start(root))?;

        self.write(Event::Start(BytesStart::new("filename")))?;
        self.write(Event::Text(BytesText::new(&meta.source_path)))?;
        self.write(Event::End(BytesEnd::new("filename")))
    }

    fn record(
        &mut self,
        record: &RecycleRecord,
        meta: &RecycleMeta,
        options: &RunOptions,
    ) -> Result<(), FormatError> {
        let mut entry = BytesStart::new("record");
        entry.push_attribute(("index", record.index.to_string().as_str()));
        entry.push_attribute((
            "time",
            format_iso(&record.deleted, options.localtime).as_str(),
        ));
        if meta.keep_deleted_entry {
            entry.push_attribute(("emptied", if record.purged { "Y" } else { "N" }));
        }
        let size = if record.size == BROKEN_SIZE {
            String::from("-1")
        } else {
            format!("{}", record.size)
        };
        entry.push_attribute(("size", size.as_str()));
        self.write(Event::Start(entry))?;

        self.write(Event::Start(BytesStart::new("path")))?;
        self.write(Event::Text(BytesText::new(record.preferred_path())))?;
        self.write(Event::End(BytesEnd::new("path")))?;

        self.write(Event::End(BytesEnd::new("record")))
    }

    fn footer(&mut self, _meta: &RecycleMeta, _options: &RunOptions) -> Result<(), FormatError> {
        self.write(Event::End(BytesEnd::new("recyclebin")))
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        let mut report = self.writer.into_inner().into_inner();
        report.push(b'\n');
        report
    }
}
