//! Encode/decode boundary to the deployed registry contract
//!
//! The gateway is the only component that knows the contract's call shapes
//! and wire encoding. Writes encode decoded params into [`ContractCall`]s
//! (fixed-point conversion happens here and nowhere else), block until the
//! ledger confirms, and return the transaction id. Reads decode raw tuples
//! back into [`crate::types`] records, mapping the zero-id sentinel to
//! `None` rather than an error.

use std::sync::Arc;

use tracing::{debug, info};

use crate::error::{RegistryError, Result};
use crate::numeric::{decode_fixed_point, encode_fixed_point};
use crate::transport::LedgerTransport;
use crate::types::{
    AuditRecord, AuditResult, AuditType, ComplianceRecord, CreateAuditParams, CreateMrvParams,
    MrvRecord, MrvStatus, ProjectAuditTrail, ReportType, RoleKind, TxId, UpdateComplianceParams,
    VerificationEvent, VerifyMrvParams,
};
use crate::wire::{
    ContractCall, ContractQuery, QueryReply, QueryRequest, RawAuditRecord, RawComplianceRecord,
    RawMrvRecord, RawVerificationEvent, SubmitRequest,
};

/// Gateway to one deployed registry contract.
///
/// The contract binding is immutable after construction; concurrent callers
/// share it freely. The ledger itself is the write-serialization point, so
/// no client-side write lock is imposed.
pub struct LedgerGateway {
    transport: Arc<dyn LedgerTransport>,
    contract_address: String,
}

impl std::fmt::Debug for LedgerGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerGateway")
            .field("contract_address", &self.contract_address)
            .finish_non_exhaustive()
    }
}

impl LedgerGateway {
    /// Bind a transport to a deployed contract address.
    pub fn new(transport: Arc<dyn LedgerTransport>, contract_address: String) -> Result<Self> {
        if contract_address.trim().is_empty() {
            return Err(RegistryError::ContractNotInitialized);
        }
        Ok(Self {
            transport,
            contract_address,
        })
    }

    pub fn contract_address(&self) -> &str {
        &self.contract_address
    }

    // ==================== Writes ====================

    pub async fn create_mrv_record(
        &self,
        signer: &str,
        params: &CreateMrvParams,
    ) -> Result<TxId> {
        let co2_fixed = encode_fixed_point(&params.co2_measured)?;
        let call = ContractCall::CreateMrvRecord {
            project_id: params.project_id.clone(),
            report_type: params.report_type.as_str().to_string(),
            data_hash: params.data_hash.clone(),
            methodology: params.methodology.clone(),
            co2_measured: co2_fixed.to_string(),
            satellite_data: params.satellite_data.clone(),
            sensor_data: params.sensor_data.clone(),
        };
        self.submit(signer, call).await
    }

    pub async fn create_audit_record(
        &self,
        signer: &str,
        params: &CreateAuditParams,
    ) -> Result<TxId> {
        let call = ContractCall::CreateAuditRecord {
            project_id: params.project_id.clone(),
            audit_type: params.audit_type.as_str().to_string(),
            findings: params.findings.clone(),
            evidence_hash: params.evidence_hash.clone(),
            result: params.result.code(),
            recommendations: params.recommendations.clone(),
        };
        self.submit(signer, call).await
    }

    pub async fn verify_mrv_record(
        &self,
        signer: &str,
        params: &VerifyMrvParams,
    ) -> Result<TxId> {
        let call = ContractCall::VerifyMrvRecord {
            mrv_record_id: params.mrv_record_id,
            approved: params.approved,
            comments: params.comments.clone(),
            criteria_hash: params.criteria_hash.clone(),
            confidence_score: params.confidence_score,
            ai_analysis: params.ai_analysis.clone(),
        };
        self.submit(signer, call).await
    }

    pub async fn update_compliance(
        &self,
        signer: &str,
        params: &UpdateComplianceParams,
    ) -> Result<TxId> {
        let call = ContractCall::UpdateCompliance {
            project_id: params.project_id.clone(),
            standard: params.standard.clone(),
            compliant: params.compliant,
            certification_hash: params.certification_hash.clone(),
            expiry_date: params.expiry_date,
        };
        self.submit(signer, call).await
    }

    pub async fn mark_audit_remediated(&self, signer: &str, audit_id: u64) -> Result<TxId> {
        self.submit(signer, ContractCall::MarkAuditRemediated { audit_id })
            .await
    }

    pub async fn grant_role(&self, signer: &str, role: RoleKind, account: &str) -> Result<TxId> {
        let account = account.to_string();
        let call = match role {
            RoleKind::Verifier => ContractCall::GrantVerifierRole { account },
            RoleKind::Auditor => ContractCall::GrantAuditorRole { account },
            RoleKind::ProjectOwner => ContractCall::GrantProjectOwnerRole { account },
            RoleKind::DataProvider => ContractCall::GrantDataProviderRole { account },
        };
        self.submit(signer, call).await
    }

    async fn submit(&self, signer: &str, call: ContractCall) -> Result<TxId> {
        let method = call.method_name();
        debug!(method, signer = %signer, "submitting contract call");

        let tx_id = self
            .transport
            .submit(SubmitRequest {
                contract: self.contract_address.clone(),
                signer: signer.to_string(),
                call,
            })
            .await?;

        info!(method, tx_id = %tx_id, "ledger write confirmed");
        Ok(tx_id)
    }

    // ==================== Reads ====================

    /// Fetch an MRV record. `None` means the id was never written; transport
    /// failures surface as `LedgerUnavailable` instead.
    pub async fn get_mrv_record(&self, id: u64) -> Result<Option<MrvRecord>> {
        match self.query(ContractQuery::MrvRecord { id }).await? {
            QueryReply::MrvRecord(raw) if raw.is_absent() => Ok(None),
            QueryReply::MrvRecord(raw) => decode_mrv_record(raw).map(Some),
            other => Err(unexpected_reply("mrvRecords", &other)),
        }
    }

    pub async fn get_audit_record(&self, id: u64) -> Result<Option<AuditRecord>> {
        match self.query(ContractQuery::AuditRecord { id }).await? {
            QueryReply::AuditRecord(raw) if raw.is_absent() => Ok(None),
            QueryReply::AuditRecord(raw) => decode_audit_record(raw).map(Some),
            other => Err(unexpected_reply("auditRecords", &other)),
        }
    }

    pub async fn get_verification_event(&self, id: u64) -> Result<Option<VerificationEvent>> {
        match self.query(ContractQuery::VerificationEvent { id }).await? {
            QueryReply::VerificationEvent(raw) if raw.is_absent() => Ok(None),
            QueryReply::VerificationEvent(raw) => Ok(Some(decode_verification_event(raw))),
            other => Err(unexpected_reply("verificationEvents", &other)),
        }
    }

    /// Always succeeds with (possibly empty) lists; never "not found".
    pub async fn get_project_audit_trail(&self, project_id: &str) -> Result<ProjectAuditTrail> {
        let query = ContractQuery::ProjectAuditTrail {
            project_id: project_id.to_string(),
        };
        match self.query(query).await? {
            QueryReply::ProjectAuditTrail(raw) => Ok(ProjectAuditTrail {
                mrv_record_ids: raw.mrv_record_ids,
                audit_record_ids: raw.audit_record_ids,
                verification_event_ids: raw.verification_event_ids,
            }),
            other => Err(unexpected_reply("getProjectAuditTrail", &other)),
        }
    }

    /// One entry per requested standard that has ever been written; standards
    /// never written are silently omitted.
    pub async fn get_project_compliance(
        &self,
        project_id: &str,
        standards: &[String],
    ) -> Result<Vec<ComplianceRecord>> {
        let query = ContractQuery::ProjectCompliance {
            project_id: project_id.to_string(),
            standards: standards.to_vec(),
        };
        match self.query(query).await? {
            QueryReply::ProjectCompliance(raw) => {
                Ok(raw.into_iter().map(decode_compliance_record).collect())
            }
            other => Err(unexpected_reply("getProjectCompliance", &other)),
        }
    }

    async fn query(&self, query: ContractQuery) -> Result<QueryReply> {
        self.transport
            .query(QueryRequest {
                contract: self.contract_address.clone(),
                query,
            })
            .await
    }
}

fn unexpected_reply(method: &str, reply: &QueryReply) -> RegistryError {
    RegistryError::Protocol(format!("unexpected reply to {method}: {reply:?}"))
}

fn decode_mrv_record(raw: RawMrvRecord) -> Result<MrvRecord> {
    let report_type = ReportType::parse(&raw.report_type).ok_or_else(|| {
        RegistryError::Protocol(format!("unknown report type {:?}", raw.report_type))
    })?;
    let status = MrvStatus::from_code(raw.status)
        .ok_or_else(|| RegistryError::Protocol(format!("unknown status code {}", raw.status)))?;
    let co2_raw: u128 = raw.co2_measured.parse().map_err(|_| {
        RegistryError::Protocol(format!("malformed co2 amount {:?}", raw.co2_measured))
    })?;

    Ok(MrvRecord {
        id: raw.id,
        project_id: raw.project_id,
        timestamp: raw.timestamp,
        report_type,
        data_hash: raw.data_hash,
        methodology: raw.methodology,
        reporter: raw.reporter,
        verified: raw.verified,
        co2_measured: decode_fixed_point(co2_raw),
        satellite_data: raw.satellite_data,
        sensor_data: raw.sensor_data,
        status,
    })
}

fn decode_audit_record(raw: RawAuditRecord) -> Result<AuditRecord> {
    let audit_type = AuditType::parse(&raw.audit_type).ok_or_else(|| {
        RegistryError::Protocol(format!("unknown audit type {:?}", raw.audit_type))
    })?;
    let result = AuditResult::from_code(raw.result).ok_or_else(|| {
        RegistryError::Protocol(format!("unknown audit result code {}", raw.result))
    })?;

    Ok(AuditRecord {
        id: raw.id,
        project_id: raw.project_id,
        timestamp: raw.timestamp,
        auditor: raw.auditor,
        audit_type,
        findings: raw.findings,
        evidence_hash: raw.evidence_hash,
        result,
        recommendations: raw.recommendations,
        remediated: raw.remediated,
        follow_up_date: match raw.follow_up_date {
            0 => None,
            ts => Some(ts),
        },
    })
}

fn decode_verification_event(raw: RawVerificationEvent) -> VerificationEvent {
    VerificationEvent {
        id: raw.id,
        project_id: raw.project_id,
        mrv_record_id: raw.mrv_record_id,
        verifier: raw.verifier,
        timestamp: raw.timestamp,
        approved: raw.approved,
        comments: raw.comments,
        criteria_hash: raw.criteria_hash,
        confidence_score: raw.confidence_score,
        ai_analysis: raw.ai_analysis,
    }
}

fn decode_compliance_record(raw: RawComplianceRecord) -> ComplianceRecord {
    ComplianceRecord {
        project_id: raw.project_id,
        standard: raw.standard,
        compliant: raw.compliant,
        last_checked: raw.last_checked,
        certification_hash: raw.certification_hash,
        expiry_date: raw.expiry_date,
    }
}
