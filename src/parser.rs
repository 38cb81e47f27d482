use std::{
    fs,
    path::Path,
    sync::Arc,
};

use tracing::{
    debug,
    info,
};

use crate::core::{
    DeckError,
    VocabRecord,
};

const DELIMITER: char = ',';
const QUOTE: char = '"';

static BUILTIN_CSV: &str = include_str!("../assets/hsk.csv");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Term,
    Phonetic,
    Definition,
    Category,
}

impl Column {
    fn from_header(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "term" | "hanza" | "hanzi" | "word" => Some(Column::Term),
            "phonetic" | "pinyin" | "reading" => Some(Column::Phonetic),
            "definition" | "english" | "meaning" => Some(Column::Definition),
            "category" | "hsk level" | "level" => Some(Column::Category),
            _ => None,
        }
    }
}

/// Parses a header row plus delimited rows into records.
///
/// Lenient on purpose: unknown columns are ignored, missing trailing fields
/// read as empty, and rows without a term or definition are dropped.
pub fn parse(raw: &str) -> Vec<VocabRecord> {
    let mut lines = raw.trim().lines();
    let columns: Vec<Option<Column>> = match lines.next() {
        Some(header) => split_fields(header).iter().map(|h| Column::from_header(h)).collect(),
        None => return Vec::new(),
    };

    let mut skipped = 0usize;
    let records: Vec<VocabRecord> = lines
        .filter_map(|line| {
            let record = parse_row(line, &columns);
            if record.is_none() {
                skipped += 1;
            }
            record
        })
        .enumerate()
        .map(|(ordinal, mut record)| {
            record.ordinal = ordinal;
            record
        })
        .collect();

    if skipped > 0 {
        debug!("Skipped {} rows without a term or definition", skipped);
    }

    records
}

fn parse_row(line: &str, columns: &[Option<Column>]) -> Option<VocabRecord> {
    let mut record = VocabRecord {
        term: String::new(),
        phonetic: String::new(),
        definition: String::new(),
        category: String::new(),
        ordinal: 0,
    };

    for (column, value) in columns.iter().zip(split_fields(line)) {
        let slot = match column {
            Some(Column::Term) => &mut record.term,
            Some(Column::Phonetic) => &mut record.phonetic,
            Some(Column::Definition) => &mut record.definition,
            Some(Column::Category) => &mut record.category,
            None => continue,
        };
        *slot = value;
    }

    if record.term.is_empty() || record.definition.is_empty() {
        return None;
    }
    Some(record)
}

/// Splits one row on the delimiter, honouring quoted fields. A doubled quote
/// inside a quoted field is a literal quote. An unterminated quote swallows
/// the rest of the line.
fn split_fields(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut chars = line.trim_end_matches('\r').chars().peekable();

    loop {
        let mut value = String::new();

        while chars.peek().is_some_and(|c| *c != DELIMITER && c.is_whitespace()) {
            chars.next();
        }

        if chars.peek() == Some(&QUOTE) {
            chars.next();
            while let Some(c) = chars.next() {
                if c != QUOTE {
                    value.push(c);
                } else if chars.peek() == Some(&QUOTE) {
                    chars.next();
                    value.push(QUOTE);
                } else {
                    break;
                }
            }
            // Anything between the closing quote and the delimiter is kept.
            while let Some(&c) = chars.peek() {
                if c == DELIMITER {
                    break;
                }
                value.push(c);
                chars.next();
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c == DELIMITER {
                    break;
                }
                value.push(c);
                chars.next();
            }
        }

        fields.push(value.trim().to_string());

        if chars.next().is_none() {
            break;
        }
    }

    fields
}

/// The HSK 1-5 word list shipped with the app.
pub fn builtin_records() -> Vec<Arc<VocabRecord>> {
    parse(BUILTIN_CSV).into_iter().map(Arc::new).collect()
}

pub fn load_records(path: &Path) -> Result<Vec<Arc<VocabRecord>>, DeckError> {
    let content = fs::read_to_string(path)?;
    let records = parse(&content);

    if records.is_empty() {
        return Err(DeckError::NoRecords(path.display().to_string()));
    }

    info!("Loaded {} records from {}", records.len(), path.display());
    Ok(records.into_iter().map(Arc::new).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_basic_row() {
        let records = parse("term,phonetic,definition,category\n大,dà,big,A1");
        assert_eq!(records.len(), 1);
        assert_eq!(
            records[0],
            VocabRecord {
                term: "大".to_string(),
                phonetic: "dà".to_string(),
                definition: "big".to_string(),
                category: "A1".to_string(),
                ordinal: 0,
            }
        );
    }

    #[test]
    fn test_quoted_fields() {
        let records = parse("term,phonetic,definition,category\n不,bù,\"no, not\",HSK 1");
        assert_eq!(records[0].definition, "no, not");
        assert_eq!(records[0].category, "HSK 1");

        let records = parse(
            "Hanza,Pinyin,English,HSK Level\n电子邮件,diànzǐ yóujiàn,\"email (lit. \"\"electronic mail\"\")\",HSK 3",
        );
        assert_eq!(records[0].definition, "email (lit. \"electronic mail\")");
        assert_eq!(records[0].category, "HSK 3");
    }

    #[test]
    fn test_header_aliases_and_column_order() {
        let records = parse("HSK Level,English,Hanza,Notes,Pinyin\nHSK 2,to sing,唱歌,ignored,chànggē");
        assert_eq!(records[0].term, "唱歌");
        assert_eq!(records[0].phonetic, "chànggē");
        assert_eq!(records[0].definition, "to sing");
        assert_eq!(records[0].category, "HSK 2");
    }

    #[test]
    fn test_drops_incomplete_rows_and_renumbers() {
        let raw = "term,phonetic,definition,category\n\
                   大,dà,big,A1\n\
                   ,duō,many,A1\n\
                   好,hǎo,,A1\n\
                   \n\
                   冷,lěng,cold,A2";
        let records = parse(raw);
        let terms: Vec<&str> = records.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(terms, vec!["大", "冷"]);
        assert_eq!(records[1].ordinal, 1);
    }

    #[test]
    fn test_missing_trailing_fields_are_empty() {
        let records = parse("term,definition,phonetic,category\n热,hot");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].phonetic, "");
        assert_eq!(records[0].category, "");
    }

    #[test]
    fn test_unterminated_quote_is_best_effort() {
        let records = parse("term,definition,category\n少,\"few, little,HSK 1");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].definition, "few, little,HSK 1");
        assert_eq!(records[0].category, "");
    }

    #[test]
    fn test_crlf_and_empty_input() {
        let records = parse("term,definition\r\n多,many\r\n高兴,happy\r\n");
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].definition, "happy");

        assert!(parse("").is_empty());
        assert!(parse("term,definition").is_empty());
    }

    #[test]
    fn test_builtin_dataset() {
        let records = builtin_records();
        assert!(records.len() > 2000);
        assert_eq!(records[0].term, "大");
        assert_eq!(records[0].category, "HSK 1");
        assert!(records.iter().enumerate().all(|(i, r)| r.ordinal == i));
        assert!(records.iter().any(|r| r.definition == "no, not"));
    }
}
