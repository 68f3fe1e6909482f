//! Raw contract call and query shapes
//!
//! These types mirror the deployed registry contract's method surface: enums
//! cross as `u8` codes, amounts as decimal strings of the 10^18-scaled
//! integer, and absent records as zero-id sentinel tuples. Nothing outside
//! this module and the gateway touches them; the rest of the crate operates
//! on the decoded types in [`crate::types`].

use serde::{Deserialize, Serialize};

/// A state-changing contract call, one variant per write method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args")]
pub enum ContractCall {
    CreateMrvRecord {
        project_id: String,
        report_type: String,
        data_hash: String,
        methodology: String,
        /// 10^18-scaled integer, decimal digits
        co2_measured: String,
        satellite_data: String,
        sensor_data: String,
    },
    CreateAuditRecord {
        project_id: String,
        audit_type: String,
        findings: String,
        evidence_hash: String,
        result: u8,
        recommendations: String,
    },
    VerifyMrvRecord {
        mrv_record_id: u64,
        approved: bool,
        comments: String,
        criteria_hash: String,
        confidence_score: u8,
        ai_analysis: String,
    },
    UpdateCompliance {
        project_id: String,
        standard: String,
        compliant: bool,
        certification_hash: String,
        expiry_date: u64,
    },
    MarkAuditRemediated {
        audit_id: u64,
    },
    GrantVerifierRole {
        account: String,
    },
    GrantAuditorRole {
        account: String,
    },
    GrantProjectOwnerRole {
        account: String,
    },
    GrantDataProviderRole {
        account: String,
    },
}

impl ContractCall {
    /// Contract method name, for logging and error context
    pub fn method_name(&self) -> &'static str {
        match self {
            ContractCall::CreateMrvRecord { .. } => "createMRVRecord",
            ContractCall::CreateAuditRecord { .. } => "createAuditRecord",
            ContractCall::VerifyMrvRecord { .. } => "verifyMRVRecord",
            ContractCall::UpdateCompliance { .. } => "updateCompliance",
            ContractCall::MarkAuditRemediated { .. } => "markAuditRemediated",
            ContractCall::GrantVerifierRole { .. } => "grantVerifierRole",
            ContractCall::GrantAuditorRole { .. } => "grantAuditorRole",
            ContractCall::GrantProjectOwnerRole { .. } => "grantProjectOwnerRole",
            ContractCall::GrantDataProviderRole { .. } => "grantDataProviderRole",
        }
    }
}

/// A read-only contract query, one variant per read method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method", content = "args")]
pub enum ContractQuery {
    MrvRecord { id: u64 },
    AuditRecord { id: u64 },
    VerificationEvent { id: u64 },
    ProjectAuditTrail { project_id: String },
    ProjectCompliance {
        project_id: String,
        standards: Vec<String>,
    },
}

/// Reply to a [`ContractQuery`], raw tuples with the sentinel intact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value")]
pub enum QueryReply {
    MrvRecord(RawMrvRecord),
    AuditRecord(RawAuditRecord),
    VerificationEvent(RawVerificationEvent),
    ProjectAuditTrail(RawAuditTrail),
    ProjectCompliance(Vec<RawComplianceRecord>),
}

/// A write, addressed to a deployed contract under a signing identity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitRequest {
    /// Deployed contract address
    pub contract: String,
    /// Ledger account the write is attributed to
    pub signer: String,
    pub call: ContractCall,
}

/// A read, addressed to a deployed contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub contract: String,
    pub query: ContractQuery,
}

/// Raw MRV record tuple. `id == 0` is the ledger's never-existed sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawMrvRecord {
    pub id: u64,
    pub project_id: String,
    pub timestamp: u64,
    pub report_type: String,
    pub data_hash: String,
    pub methodology: String,
    pub reporter: String,
    pub verified: bool,
    /// 10^18-scaled integer, decimal digits
    pub co2_measured: String,
    pub satellite_data: String,
    pub sensor_data: String,
    pub status: u8,
}

impl RawMrvRecord {
    pub fn is_absent(&self) -> bool {
        self.id == 0
    }
}

/// Raw audit record tuple, zero-id sentinel when absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAuditRecord {
    pub id: u64,
    pub project_id: String,
    pub timestamp: u64,
    pub auditor: String,
    pub audit_type: String,
    pub findings: String,
    pub evidence_hash: String,
    pub result: u8,
    pub recommendations: String,
    pub remediated: bool,
    /// 0 means no follow-up scheduled
    pub follow_up_date: u64,
}

impl RawAuditRecord {
    pub fn is_absent(&self) -> bool {
        self.id == 0
    }
}

/// Raw verification event tuple, zero-id sentinel when absent
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawVerificationEvent {
    pub id: u64,
    pub project_id: String,
    pub mrv_record_id: u64,
    pub verifier: String,
    pub timestamp: u64,
    pub approved: bool,
    pub comments: String,
    pub criteria_hash: String,
    pub confidence_score: u8,
    pub ai_analysis: String,
}

impl RawVerificationEvent {
    pub fn is_absent(&self) -> bool {
        self.id == 0
    }
}

/// Raw per-project index lists, ledger creation order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawAuditTrail {
    pub mrv_record_ids: Vec<u64>,
    pub audit_record_ids: Vec<u64>,
    pub verification_event_ids: Vec<u64>,
}

/// Raw compliance tuple; only standards ever written are returned
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawComplianceRecord {
    pub project_id: String,
    pub standard: String,
    pub compliant: bool,
    pub last_checked: u64,
    pub certification_hash: String,
    pub expiry_date: u64,
}
