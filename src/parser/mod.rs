
use csv::{ReaderBuilder, StringRecord, StringRecordsIntoIter};

/// Field delimiter of the source format.
pub const DELIMITER: u8 = b';';

/// Lazy, ordered, single-pass reader over the data rows of one file body.
///
/// The first line is the header and is consumed without being validated
/// against the expected schema. Quoting follows standard CSV rules, so a
/// delimiter or newline inside a quoted field neither splits nor merges
/// rows. The reader is not restartable; going over the rows again means
/// re-fetching the source text.
pub struct RowReader<'a> {
    records: StringRecordsIntoIter<&'a [u8]>
}

impl<'a> RowReader<'a> {
    pub fn new(body: &'a str) -> Self {
        //NOTE: Splitting on newlines by hand would tear quoted fields apart, so all
        //      row framing is left to the csv reader.
        let reader = ReaderBuilder::new()
            .delimiter(DELIMITER)
            .has_headers(true)
            .flexible(true)
            .from_reader(body.as_bytes());

        Self {
            records: reader.into_records()
        }
    }
}

impl<'a> Iterator for RowReader<'a> {
    type Item = Result<StringRecord, csv::Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.records.next()
    }
}
