//! Decoded record types for the registry API
//!
//! Everything here is the application-facing, decoded view of ledger state.
//! Raw contract tuples and wire codes live in [`crate::wire`] and never leak
//! past the gateway boundary.

use serde::{Deserialize, Serialize};

/// Confirmed ledger transaction identifier
pub type TxId = String;

/// Kind of monitoring/reporting submission
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Monitoring,
    Reporting,
    Verification,
}

impl ReportType {
    /// Contract-side string form
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Monitoring => "monitoring",
            ReportType::Reporting => "reporting",
            ReportType::Verification => "verification",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "monitoring" => Some(ReportType::Monitoring),
            "reporting" => Some(ReportType::Reporting),
            "verification" => Some(ReportType::Verification),
            _ => None,
        }
    }
}

/// Lifecycle status of an MRV record. Terminal once non-pending.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MrvStatus {
    Pending,
    Verified,
    Rejected,
    Expired,
}

impl MrvStatus {
    /// Decode the ledger's enum code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(MrvStatus::Pending),
            1 => Some(MrvStatus::Verified),
            2 => Some(MrvStatus::Rejected),
            3 => Some(MrvStatus::Expired),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            MrvStatus::Pending => 0,
            MrvStatus::Verified => 1,
            MrvStatus::Rejected => 2,
            MrvStatus::Expired => 3,
        }
    }
}

/// Kind of project audit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuditType {
    Internal,
    External,
    Regulatory,
    Compliance,
}

impl AuditType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditType::Internal => "internal",
            AuditType::External => "external",
            AuditType::Regulatory => "regulatory",
            AuditType::Compliance => "compliance",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "internal" => Some(AuditType::Internal),
            "external" => Some(AuditType::External),
            "regulatory" => Some(AuditType::Regulatory),
            "compliance" => Some(AuditType::Compliance),
            _ => None,
        }
    }
}

/// Audit outcome, ordered by severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AuditResult {
    Satisfactory,
    MinorIssues,
    MajorIssues,
    CriticalIssues,
}

impl AuditResult {
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(AuditResult::Satisfactory),
            1 => Some(AuditResult::MinorIssues),
            2 => Some(AuditResult::MajorIssues),
            3 => Some(AuditResult::CriticalIssues),
            _ => None,
        }
    }

    pub fn code(&self) -> u8 {
        match self {
            AuditResult::Satisfactory => 0,
            AuditResult::MinorIssues => 1,
            AuditResult::MajorIssues => 2,
            AuditResult::CriticalIssues => 3,
        }
    }
}

/// Ledger role grantable to an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleKind {
    Verifier,
    Auditor,
    ProjectOwner,
    DataProvider,
}

/// A monitoring/reporting submission, decoded from ledger state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MrvRecord {
    /// Ledger-assigned id, monotonic within the MRV id space
    pub id: u64,
    pub project_id: String,
    /// Ledger block time, seconds since epoch
    pub timestamp: u64,
    pub report_type: ReportType,
    /// Content address of the underlying evidence payload
    pub data_hash: String,
    /// Standard identifier, e.g. a VCS or Gold Standard methodology code
    pub methodology: String,
    /// Ledger account that submitted the record
    pub reporter: String,
    /// Flips false -> true at most once, driven by the ledger
    pub verified: bool,
    /// Decoded decimal quantity, non-negative
    pub co2_measured: String,
    /// Content address of supporting satellite payload
    pub satellite_data: String,
    /// Content address of supporting sensor payload
    pub sensor_data: String,
    pub status: MrvStatus,
}

/// An independent compliance/quality audit of a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: u64,
    pub project_id: String,
    pub timestamp: u64,
    /// Ledger account holding the auditor role
    pub auditor: String,
    pub audit_type: AuditType,
    /// Content address of the findings payload
    pub findings: String,
    pub evidence_hash: String,
    pub result: AuditResult,
    /// Content address of the recommendations payload
    pub recommendations: String,
    /// Set true once via remediation marking, never reverted
    pub remediated: bool,
    /// Optional follow-up timestamp; the ledger's 0 sentinel decodes to None
    pub follow_up_date: Option<u64>,
}

/// A verifier's judgment on one MRV record. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationEvent {
    pub id: u64,
    pub project_id: String,
    pub mrv_record_id: u64,
    pub verifier: String,
    pub timestamp: u64,
    pub approved: bool,
    /// Content address of the verifier's comments
    pub comments: String,
    /// Content address of the rubric applied
    pub criteria_hash: String,
    /// Composite trust metric, 0-100 inclusive
    pub confidence_score: u8,
    /// Content address of any automated-analysis report consulted
    pub ai_analysis: String,
}

/// Current compliance status of a project against one named standard.
///
/// (project_id, standard) is the logical key; only the latest write is
/// queryable on-chain. Historical states must come from the event feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub project_id: String,
    /// Standard identifier, e.g. "VCS" or "Gold Standard"
    pub standard: String,
    pub compliant: bool,
    pub last_checked: u64,
    pub certification_hash: String,
    pub expiry_date: u64,
}

impl ComplianceRecord {
    /// The ledger does not auto-expire compliance; callers check staleness.
    pub fn is_expired(&self, now: u64) -> bool {
        now > self.expiry_date
    }
}

/// Derived per-project aggregation of record ids in ledger creation order.
/// Recomputed on read, never stored.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectAuditTrail {
    pub mrv_record_ids: Vec<u64>,
    pub audit_record_ids: Vec<u64>,
    pub verification_event_ids: Vec<u64>,
}

/// Parameters for creating an MRV record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateMrvParams {
    pub project_id: String,
    pub report_type: ReportType,
    pub data_hash: String,
    pub methodology: String,
    /// Human decimal string; fixed-point encoded at the gateway boundary
    pub co2_measured: String,
    pub satellite_data: String,
    pub sensor_data: String,
}

/// Parameters for submitting a verification event.
///
/// The confidence score is supplied by the caller, either from
/// [`crate::scoring::compute_confidence_score`] or a manual override.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyMrvParams {
    pub mrv_record_id: u64,
    pub approved: bool,
    pub comments: String,
    pub criteria_hash: String,
    pub confidence_score: u8,
    /// Content address of an automated-analysis report, empty if none
    #[serde(default)]
    pub ai_analysis: String,
}

/// Parameters for creating an audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAuditParams {
    pub project_id: String,
    pub audit_type: AuditType,
    pub findings: String,
    pub evidence_hash: String,
    pub result: AuditResult,
    pub recommendations: String,
}

/// Parameters for an update-compliance write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateComplianceParams {
    pub project_id: String,
    pub standard: String,
    pub compliant: bool,
    pub certification_hash: String,
    pub expiry_date: u64,
}

/// Ledger-emitted event, decoded per kind
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum LedgerEvent {
    MrvRecordCreated {
        id: u64,
        project_id: String,
        reporter: String,
        report_type: ReportType,
        timestamp: u64,
    },
    AuditRecordCreated {
        id: u64,
        project_id: String,
        auditor: String,
        audit_type: AuditType,
        timestamp: u64,
    },
    VerificationCompleted {
        id: u64,
        project_id: String,
        mrv_record_id: u64,
        verifier: String,
        approved: bool,
        confidence_score: u8,
    },
    ComplianceUpdated {
        project_id: String,
        standard: String,
        compliant: bool,
        timestamp: u64,
    },
    DataIntegrityAlert {
        project_id: String,
        alert_type: String,
        description: String,
        timestamp: u64,
    },
}

/// Event kind, used to key handler registration and dispatch lanes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    MrvRecordCreated,
    AuditRecordCreated,
    VerificationCompleted,
    ComplianceUpdated,
    DataIntegrityAlert,
}

impl EventKind {
    pub const ALL: [EventKind; 5] = [
        EventKind::MrvRecordCreated,
        EventKind::AuditRecordCreated,
        EventKind::VerificationCompleted,
        EventKind::ComplianceUpdated,
        EventKind::DataIntegrityAlert,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::MrvRecordCreated => "mrv_record_created",
            EventKind::AuditRecordCreated => "audit_record_created",
            EventKind::VerificationCompleted => "verification_completed",
            EventKind::ComplianceUpdated => "compliance_updated",
            EventKind::DataIntegrityAlert => "data_integrity_alert",
        }
    }
}

impl LedgerEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            LedgerEvent::MrvRecordCreated { .. } => EventKind::MrvRecordCreated,
            LedgerEvent::AuditRecordCreated { .. } => EventKind::AuditRecordCreated,
            LedgerEvent::VerificationCompleted { .. } => EventKind::VerificationCompleted,
            LedgerEvent::ComplianceUpdated { .. } => EventKind::ComplianceUpdated,
            LedgerEvent::DataIntegrityAlert { .. } => EventKind::DataIntegrityAlert,
        }
    }
}
