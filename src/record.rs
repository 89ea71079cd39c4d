//! Record and lookup catalogs.
//!
//! Each ServiceNow entity class the helper knows about is a variant here and
//! carries the `nav_to.do` path template it opens.

use std::fmt;

use crate::error::AppError;

/// Record types addressed by an exact ticket number.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordType {
    Incident,
    Change,
    ChangeTask,
    CatalogTask,
    Request,
    RequestItem,
    Task,
    Knowledge,
}

impl RecordType {
    pub const ALL: [RecordType; 8] = [
        RecordType::Incident,
        RecordType::Change,
        RecordType::ChangeTask,
        RecordType::CatalogTask,
        RecordType::Request,
        RecordType::RequestItem,
        RecordType::Task,
        RecordType::Knowledge,
    ];

    /// Number prefix, e.g. `INC` in `INC0012345`.
    pub fn prefix(self) -> &'static str {
        match self {
            RecordType::Incident => "INC",
            RecordType::Change => "CHG",
            RecordType::ChangeTask => "CTASK",
            RecordType::CatalogTask => "SCTASK",
            RecordType::Request => "REQ",
            RecordType::RequestItem => "RITM",
            RecordType::Task => "TASK",
            RecordType::Knowledge => "KB",
        }
    }

    pub fn path_template(self) -> &'static str {
        match self {
            RecordType::Incident => "incident.do?sysparm_query=number=",
            RecordType::Change => "change_request.do?sysparm_query=number=",
            RecordType::ChangeTask => "change_task.do?sysparm_query=number=",
            RecordType::CatalogTask => "sc_task.do?sysparm_query=number=",
            RecordType::Request => "sc_request.do?sysparm_query=number=",
            RecordType::RequestItem => "sc_req_item.do?sysparm_query=number=",
            RecordType::Task => "task.do?sysparm_query=number=",
            RecordType::Knowledge => "kb_knowledge.do?sysparm_query=number=",
        }
    }

    pub fn from_prefix(prefix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|rt| rt.prefix() == prefix)
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

/// Lookup types addressed by free text (email, name).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LookupType {
    User,
    Group,
    ConfigurationItem,
}

impl LookupType {
    pub const ALL: [LookupType; 3] = [
        LookupType::User,
        LookupType::Group,
        LookupType::ConfigurationItem,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            LookupType::User => "User",
            LookupType::Group => "Group",
            LookupType::ConfigurationItem => "CI",
        }
    }

    pub fn path_template(self) -> &'static str {
        match self {
            LookupType::User => "sys_user.do?sysparm_query=email=",
            LookupType::Group => "sys_user_group.do?sysparm_query=name=",
            LookupType::ConfigurationItem => "cmdb_ci.do?sysparm_query=name=",
        }
    }

    pub fn from_tag(tag: &str) -> Result<Self, AppError> {
        Self::ALL
            .into_iter()
            .find(|lt| lt.tag() == tag)
            .ok_or_else(|| AppError::UnsupportedLookupType(tag.to_string()))
    }
}

impl fmt::Display for LookupType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// One entry of the interface chooser.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    Record(RecordType),
    Lookup(LookupType),
}

impl Target {
    /// Chooser order.
    pub const ALL: [Target; 11] = [
        Target::Record(RecordType::Incident),
        Target::Record(RecordType::ChangeTask),
        Target::Record(RecordType::Change),
        Target::Record(RecordType::CatalogTask),
        Target::Record(RecordType::Request),
        Target::Record(RecordType::RequestItem),
        Target::Record(RecordType::Task),
        Target::Record(RecordType::Knowledge),
        Target::Lookup(LookupType::User),
        Target::Lookup(LookupType::Group),
        Target::Lookup(LookupType::ConfigurationItem),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Target::Record(RecordType::Incident) => "INC Ticket",
            Target::Record(RecordType::Change) => "CHG Change",
            Target::Record(rt) => rt.prefix(),
            Target::Lookup(LookupType::User) => "User Lookup",
            Target::Lookup(LookupType::Group) => "Group Lookup",
            Target::Lookup(LookupType::ConfigurationItem) => "CI Lookup",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.label() == label)
    }
}

/// A resolved ticket number: prefix plus exactly `ticket_length` digits.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identifier {
    record_type: RecordType,
    digits: String,
}

impl Identifier {
    /// Zero-pads `digits` to `width`. Callers guarantee `digits` is ASCII
    /// numeric and no longer than `width`.
    pub(crate) fn padded(record_type: RecordType, digits: &str, width: usize) -> Self {
        Self {
            record_type,
            digits: format!("{:0>width$}", digits, width = width),
        }
    }

    pub fn record_type(&self) -> RecordType {
        self.record_type
    }

    pub fn digits(&self) -> &str {
        &self.digits
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.record_type.prefix(), self.digits)
    }
}
