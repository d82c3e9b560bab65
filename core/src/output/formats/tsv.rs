use super::{BinEmitter, FormatError};
use crate::structs::options::RunOptions;
use crate::utils::time::{format_timestamp, tz_name, tz_offset_label};
use common::windows::{BROKEN_SIZE, BinVersion, RecycleMeta, RecycleRecord};

/// Delimited text report: a human-readable preamble, a column name row,
/// one row per record
pub(crate) struct TsvEmitter {
    buffer: String,
}

impl TsvEmitter {
    pub(crate) fn new() -> TsvEmitter {
        TsvEmitter {
            buffer: String::new(),
        }
    }
}

impl BinEmitter for TsvEmitter {
    fn header(&mut self, meta: &RecycleMeta, options: &RunOptions) -> Result<(), FormatError> {
        if !options.no_heading {
            self.buffer
                .push_str(&format!("Recycle bin path: '{}'\n", meta.source_path));

            let version = match meta.version {
                BinVersion::Known(value) => format!("{value}"),
                BinVersion::NotFound => String::from("??? (empty folder)"),
                BinVersion::Inconsistent => String::from("???"),
            };
            self.buffer.push_str(&format!("Version: {version}\n"));
            self.buffer
                .push_str(&format!("OS Guess: {}\n", meta.os_guess));
            self.buffer.push_str(&format!(
                "Time zone: {} [{}]\n",
                tz_name(options.localtime),
                tz_offset_label(options.localtime)
            ));
            self.buffer.push('\n');
        }

        // The column row is always printed, even with headings off.
        // There is no Drive column, the letter lives inside the path
        let mut columns = vec!["Index", "Deleted Time"];
        if meta.keep_deleted_entry {
            columns.push("Gone?");
        }
        columns.push("Size");
        columns.push("Path");
        self.buffer.push_str(&columns.join(&options.delimiter));
        self.buffer.push('\n');
        Ok(())
    }

    fn record(
        &mut self,
        record: &RecycleRecord,
        meta: &RecycleMeta,
        options: &RunOptions,
    ) -> Result<(), FormatError> {
        let mut fields = vec![
            record.index.to_string(),
            format_timestamp(&record.deleted, options.localtime),
        ];
        if meta.keep_deleted_entry {
            fields.push(String::from(if record.purged { "Yes" } else { "No" }));
        }
        fields.push(if record.size == BROKEN_SIZE {
            String::from("???")
        } else {
            format!("{}", record.size)
        });
        fields.push(record.preferred_path().to_string());

        self.buffer.push_str(&fields.join(&options.delimiter));
        self.buffer.push('\n');
        Ok(())
    }

    fn footer(&mut self, _meta: &RecycleMeta, _options: &RunOptions) -> Result<(), FormatError> {
        Ok(())
    }

    fn finish(self: Box<Self>) -> Vec<u8> {
        self.buffer.into_bytes()
    }
}

#[cfg(test)]
mod tests {
    use super::TsvEmitter;
    use crate::output::formats::BinEmitter;
    use crate::structs::options::RunOptions;
    use common::windows::{
        BROKEN_SIZE, BinFormat, BinVersion, OsGuess, RecordIndex, RecycleMeta, RecycleRecord,
    };

    fn modern_meta() -> RecycleMeta {
        RecycleMeta {
            format: BinFormat::ModernDir,
            source_path: String::from("/cases/$Recycle.bin"),
            version: BinVersion::Known(2),
            record_size: None,
            os_guess: OsGuess::Win10,
            has_unicode_path: true,
            keep_deleted_entry: false,
            fill_junk: false,
            is_empty: false,
        }
    }

    fn modern_record() -> RecycleRecord {
        RecycleRecord {
            version: 2,
            index: RecordIndex::Basename(String::from("$I6XYJDV.xlsx")),
            deleted: 1631147228,
            size: 4096,
            drive_letter: None,
            purged: false,
            unicode_path: String::from("C:\\Users\\alice\\Documents\\budget.xlsx"),
            legacy_path: None,
        }
    }

    #[test]
    fn test_tsv_report() {
        let meta = modern_meta();
        let options = RunOptions::default();
        let mut emitter = Box::new(TsvEmitter::new());
        emitter.header(&meta, &options).unwrap();
        emitter.record(&modern_record(), &meta, &options).unwrap();
        emitter.footer(&meta, &options).unwrap();

        let report = String::from_utf8(emitter.finish()).unwrap();
        assert!(report.starts_with("Recycle bin path: '/cases/$Recycle.bin'\n"));
        assert!(report.contains("Version: 2\n"));
        assert!(report.contains("OS Guess: Windows 10 or above\n"));
        assert!(report.contains("Time zone: UTC [+0000]\n"));
        assert!(report.contains("Index\tDeleted Time\tSize\tPath\n"));
        assert!(report.ends_with(
            "$I6XYJDV.xlsx\t2021-09-09 00:27:08\t4096\tC:\\Users\\alice\\Documents\\budget.xlsx\n"
        ));
    }

    #[test]
    fn test_tsv_no_heading() {
        let meta = modern_meta();
        let options = RunOptions {
            no_heading: true,
            ..Default::default()
        };
        let mut emitter = Box::new(TsvEmitter::new());
        emitter.header(&meta, &options).unwrap();

        let report = String::from_utf8(emitter.finish()).unwrap();
        assert_eq!(report, "Index\tDeleted Time\tSize\tPath\n");
    }

    #[test]
    fn test_tsv_empty_bin_version() {
        let mut meta = modern_meta();
        meta.version = BinVersion::NotFound;
        meta.is_empty = true;
        meta.os_guess = common::windows::OsGuess::Unknown;

        let options = RunOptions::default();
        let mut emitter = Box::new(TsvEmitter::new());
        emitter.header(&meta, &options).unwrap();

        let report = String::from_utf8(emitter.finish()).unwrap();
        assert!(report.contains("Version: ??? (empty folder)\n"));
    }

    #[test]
    fn test_tsv_legacy_gone_and_broken_size() {
        let mut meta = modern_meta();
        meta.format = BinFormat::Info2;
        meta.keep_deleted_entry = true;

        let mut record = modern_record();
        record.index = RecordIndex::Sequence(4);
        record.purged = true;
        record.size = BROKEN_SIZE;
        record.unicode_path = String::from("C:\\gone.txt");

        let options = RunOptions {
            no_heading: true,
            delimiter: String::from("|"),
            ..Default::default()
        };
        let mut emitter = Box::new(TsvEmitter::new());
        emitter.header(&meta, &options).unwrap();
        emitter.record(&record, &meta, &options).unwrap();

        let report = String::from_utf8(emitter.finish()).unwrap();
        assert!(report.contains("Index|Deleted Time|Gone?|Size|Path\n"));
        assert!(report.contains("4|2021-09-09 00:27:08|Yes|???|C:\\gone.txt\n"));
    }
}
