use regex::Regex;

use crate::error::AppError;
use crate::record::{Identifier, RecordType};

/// Ticket-number recognition for one configured ticket length.
///
/// Patterns are compiled once; rebuild the resolver when the ticket length
/// changes.
#[derive(Debug, Clone)]
pub struct IdentifierResolver {
    ticket_length: usize,
    full: Vec<(RecordType, Regex)>,
    bare_number: Regex,
}

impl IdentifierResolver {
    pub fn new(ticket_length: u32) -> Result<Self, AppError> {
        let n = ticket_length as usize;
        let full = RecordType::ALL
            .into_iter()
            .map(|rt| -> Result<(RecordType, Regex), AppError> {
                let pattern = format!(r"\b{}[0-9]{{{}}}\b", rt.prefix(), n);
                Ok((rt, Regex::new(&pattern)?))
            })
            .collect::<Result<Vec<_>, _>>()?;
        let bare_number = Regex::new(&format!(r"\b[0-9]{{1,{}}}\b", n))?;
        Ok(Self {
            ticket_length: n,
            full,
            bare_number,
        })
    }

    pub fn ticket_length(&self) -> usize {
        self.ticket_length
    }

    fn full_pattern(&self, record_type: RecordType) -> Option<&Regex> {
        self.full
            .iter()
            .find(|(rt, _)| *rt == record_type)
            .map(|(_, re)| re)
    }

    /// First whole-word full identifier of `record_type` inside `text`.
    pub fn search(&self, record_type: RecordType, text: &str) -> Option<Identifier> {
        let m = self.full_pattern(record_type)?.find(text)?;
        let digits = &m.as_str()[record_type.prefix().len()..];
        Some(Identifier::padded(record_type, digits, self.ticket_length))
    }

    /// Full identifier first, then a bare number of up to `ticket_length`
    /// digits, zero-padded. Input is compared as given.
    pub fn resolve(&self, record_type: RecordType, text: &str) -> Option<Identifier> {
        if let Some(id) = self.search(record_type, text) {
            return Some(id);
        }
        let digits = self.bare_number.find(text)?;
        Some(Identifier::padded(
            record_type,
            digits.as_str(),
            self.ticket_length,
        ))
    }

    /// Clipboard pre-check: the whole (trimmed, upper-cased) text must be a
    /// full identifier of some known record type.
    pub fn find_exact(&self, text: &str) -> Option<Identifier> {
        let candidate = text.trim().to_uppercase();
        if candidate.is_empty() {
            return None;
        }
        self.full.iter().find_map(|(rt, re)| {
            let m = re.find(&candidate)?;
            if m.start() == 0 && m.end() == candidate.len() {
                self.search(*rt, &candidate)
            } else {
                None
            }
        })
    }
}
