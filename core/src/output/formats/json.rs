use super::{BinEmitter, FormatError};
use crate::structs::options::RunOptions;
use crate::utils::encoding::json_escape;
use crate::utils::time::format_iso;
use common::windows::{BROKEN_SIZE, BinVersion, RecordIndex, RecycleMeta, RecycleRecord};

/// JSON report. Assembled by hand: the string grammar here owns the
/// rewrite of `*uXXXX` placeholders into `\u` escapes, which a generic
/// serializer would clobber
pub(crate) struct JsonEmitter {
    buffer: String,
    wrote_record: bool,
}

impl JsonEmitter {
    pub(crate) fn new() -> JsonEmitter {
        JsonEmitter {
            buffer: String::new(),
            wrote_record: false,
        }
    }
}

impl BinEmitter for JsonEmitter {
    fn header(&mut self, meta: &RecycleMeta, _options: &RunOptions) -> Result<(), FormatError> {
        self.buffer.push_str("{\n");
        self.buffer
            .push_str(&format!("  \"format\": \"{}\",\n", meta.format.label()));

        let version = match meta.version {
            BinVersion::Known(value) => format!("{value}"),
            BinVersion::NotFound | BinVersion::Inconsistent => String::from("null"),
        };
        self.buffer.push_str(&format!("  \"version\": {version},\n"));
        self.buffer.push_str(&format!(
            "  \"path\": \"{}\",\n",
            json_escape(&meta.source_path)
        ));
        self.buffer.push_str("  \"records\": [");
        Ok(())
    }

    fn record(
        &mut self,
        record: &RecycleRecord,
        meta: &RecycleMeta,
        options: &RunOptions,
    ) -> Result<(), FormatError> {
        if self.wrote_record {
            self.buffer.push(',');
        }
        self.wrote_record = true;
        self.buffer.push_str("\n    {");

        match &record.index {
            RecordIndex::Sequence(value) => {
                self.buffer.push_str(&format!("\"index\": {value}, "));
            }
            RecordIndex::Basename(name) => {
                self.buffer
                    .push_str(&format!("\"index\": \"{}\", ", json_escape(name)));
            }
        }
        self.buffer.push_str(&format!(
            "\"time\": \"{}\", ",
            format_iso(&record.deleted, options.localtime)
        ));
        if meta.keep_deleted_entry {
            let gone = if record.purged { "true" } else { "false" };
            self.buffer.push_str(&format!("\"gone\": \"{gone}\", "));
        }
        if record.size == BROKEN_SIZE {
            self.buffer.push_str("\"size\": null, ");
        } else {
            self.buffer
                .push_str(&format!("\"size\": {}, ", record.size));
        }
        self.buffer.push_str(&format!(
            "\"path\": \"{}\"}}",
            json_escape(record.preferred_path())
        ));
        Ok(())
    }

    fn footer(&mut self, _meta: &RecycleMeta, _options: &RunOptions) -> Result<(), FormatError> {
        if self.wrote_record {
            self.buffer.push_str("\n  ");
        }
        self.buffer.push_str("]\n}\n");
        Ok(())
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.buffer.into_bytes()
    }
}
