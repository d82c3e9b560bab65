pub mod error;
pub(crate) mod formats;
pub(crate) mod local;

use crate::structs::options::{OutputFormat, RunOptions};
use common::windows::{BinFormat, RecycleBinData};
use error::OutputError;
use formats::json::JsonEmitter;
use formats::tsv::TsvEmitter;
use formats::xml::XmlEmitter;
use formats::BinEmitter;

/// Render one decoder run and hand it to the output sink. Modern
/// records are sorted by deletion time then basename first; INFO2
/// records stay in on-disk (chronological) order
pub fn output_report(data: &mut RecycleBinData, options: &RunOptions) -> Result<(), OutputError> {
    if data.meta.format == BinFormat::ModernDir {
        data.records.sort_by(|left, right| {
            left.deleted
                .cmp(&right.deleted)
                .then_with(|| left.index.to_string().cmp(&right.index.to_string()))
        });
    }

    let mut emitter: Box<dyn BinEmitter> = match options.format {
        OutputFormat::Text => Box::new(TsvEmitter::new()),
        OutputFormat::Xml => Box::new(XmlEmitter::new()),
        OutputFormat::Json => Box::new(JsonEmitter::new()),
    };

    emitter
        .header(&data.meta, options)
        .map_err(|_err| OutputError::Format)?;
    for record in &data.records {
        emitter
            .record(record, &data.meta, options)
            .map_err(|_err| OutputError::Format)?;
    }
    emitter
        .footer(&data.meta, options)
        .map_err(|_err| OutputError::Format)?;

    local::final_output(&emitter.finish(), options.output_file.as_deref())
}

#[cfg(test)]
mod tests {
    use super::output_report;
    use crate::structs::options::RunOptions;
    use common::windows::{
        BinFormat, BinVersion, OsGuess, RecordIndex, RecycleBinData, RecycleMeta, RecycleRecord,
    };
    use std::fs::{read_to_string, remove_file};

    fn record(basename: &str, deleted: i64) -> RecycleRecord {
        RecycleRecord {
            version: 2,
            index: RecordIndex::Basename(basename.to_string()),
            deleted,
            size: 10,
            drive_letter: None,
            purged: false,
            unicode_path: format!("C:\\{basename}.txt"),
            legacy_path: None,
        }
    }

    #[test]
    fn test_output_report_sorts_modern() {
        let meta = RecycleMeta {
            format: BinFormat::ModernDir,
            source_path: String::from("bin"),
            version: BinVersion::Known(2),
            record_size: None,
            os_guess: OsGuess::Win10,
            has_unicode_path: true,
            keep_deleted_entry: false,
            fill_junk: false,
            is_empty: false,
        };
        let mut data = RecycleBinData {
            meta,
            records: vec![
                record("$IBBBBBB", 200),
                record("$IAAAAAA", 200),
                record("$ICCCCCC", 100),
            ],
            warnings: Vec::new(),
        };

        let target = format!("{}/binsift_sort_test.txt", std::env::temp_dir().display());
        let options = RunOptions {
            no_heading: true,
            output_file: Some(target.clone()),
            ..Default::default()
        };
        output_report(&mut data, &options).unwrap();

        assert_eq!(data.records[0].index, RecordIndex::Basename(String::from("$ICCCCCC")));
        assert_eq!(data.records[1].index, RecordIndex::Basename(String::from("$IAAAAAA")));
        assert_eq!(data.records[2].index, RecordIndex::Basename(String::from("$IBBBBBB")));

        let report = read_to_string(&target).unwrap();
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("$ICCCCCC"));
        let _ = remove_file(&target);
    }
}
