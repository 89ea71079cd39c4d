use crate::record::{Identifier, LookupType};

/// `https://{company}.service-now.com/nav_to.do?uri={template}{value}`.
///
/// Nothing is escaped; `value` must already be a validated identifier or the
/// user's lookup text.
pub fn build_url(company_name: &str, path_template: &str, value: &str) -> String {
    format!(
        "https://{}.service-now.com/nav_to.do?uri={}{}",
        company_name, path_template, value
    )
}

pub fn record_url(company_name: &str, id: &Identifier) -> String {
    build_url(
        company_name,
        id.record_type().path_template(),
        &id.to_string(),
    )
}

pub fn lookup_url(company_name: &str, lookup: LookupType, value: &str) -> String {
    build_url(company_name, lookup.path_template(), value)
}
