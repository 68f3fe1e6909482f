//! In-memory ledger for integration tests
//!
//! Implements [`LedgerTransport`] with the deployed contract's semantics:
//! disjoint id counters per record space, role enforcement on writes,
//! verification flipping record status, per-project audit trails in creation
//! order, compliance upsert keyed by (project, standard), and event emission
//! on every confirmed write. An outage switch makes every call fail with
//! `LedgerUnavailable` to simulate transport loss.

#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tokio::sync::broadcast;

use mrv_registry_client::wire::{
    ContractCall, ContractQuery, QueryReply, QueryRequest, RawAuditRecord, RawAuditTrail,
    RawComplianceRecord, RawMrvRecord, RawVerificationEvent, SubmitRequest,
};
use mrv_registry_client::{
    AuditType, LedgerEvent, LedgerTransport, RegistryError, ReportType, Result, TxId,
};

pub const CONTRACT: &str = "0xregistry";
pub const ADMIN: &str = "0xadmin";
pub const REPORTER: &str = "0xreporter";
pub const VERIFIER: &str = "0xverifier";
pub const AUDITOR: &str = "0xauditor";

const GENESIS_TIME: u64 = 1_700_000_000;

#[derive(Default)]
struct LedgerState {
    now: u64,
    next_tx: u64,
    next_mrv_id: u64,
    next_audit_id: u64,
    next_verification_id: u64,
    mrv_records: BTreeMap<u64, RawMrvRecord>,
    audit_records: BTreeMap<u64, RawAuditRecord>,
    verification_events: BTreeMap<u64, RawVerificationEvent>,
    compliance: BTreeMap<(String, String), RawComplianceRecord>,
    trails: BTreeMap<String, RawAuditTrail>,
    roles: BTreeSet<(&'static str, String)>,
}

impl LedgerState {
    fn tick(&mut self) -> u64 {
        self.now += 1;
        self.now
    }

    fn has_role(&self, role: &'static str, account: &str) -> bool {
        self.roles.contains(&(role, account.to_string()))
    }

    fn trail(&mut self, project_id: &str) -> &mut RawAuditTrail {
        self.trails.entry(project_id.to_string()).or_default()
    }
}

pub struct MockLedger {
    address: String,
    state: Mutex<LedgerState>,
    events: broadcast::Sender<LedgerEvent>,
    offline: AtomicBool,
    submit_calls: AtomicUsize,
    query_calls: AtomicUsize,
}

impl MockLedger {
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(64);
        Self {
            address: CONTRACT.to_string(),
            state: Mutex::new(LedgerState {
                now: GENESIS_TIME,
                next_mrv_id: 1,
                next_audit_id: 1,
                next_verification_id: 1,
                next_tx: 1,
                ..Default::default()
            }),
            events,
            offline: AtomicBool::new(false),
            submit_calls: AtomicUsize::new(0),
            query_calls: AtomicUsize::new(0),
        }
    }

    /// Grant a role directly, bypassing the transaction path (test setup).
    pub fn seed_role(&self, role: &'static str, account: &str) {
        self.state
            .lock()
            .unwrap()
            .roles
            .insert((role, account.to_string()));
    }

    /// Simulate transport loss: every subsequent call fails indeterminate.
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn submit_count(&self) -> usize {
        self.submit_calls.load(Ordering::SeqCst)
    }

    pub fn query_count(&self) -> usize {
        self.query_calls.load(Ordering::SeqCst)
    }

    /// Push an event into the feed without a write (ordering tests).
    pub fn emit(&self, event: LedgerEvent) {
        let _ = self.events.send(event);
    }

    fn reject(operation: &'static str, reason: &str) -> RegistryError {
        RegistryError::TransactionFailed {
            operation,
            reason: reason.to_string(),
        }
    }

    fn apply(&self, signer: &str, call: ContractCall) -> Result<TxId> {
        let mut state = self.state.lock().unwrap();
        let operation = call.method_name();

        match call {
            ContractCall::CreateMrvRecord {
                project_id,
                report_type,
                data_hash,
                methodology,
                co2_measured,
                satellite_data,
                sensor_data,
            } => {
                if !state.has_role("data_provider", signer) {
                    return Err(Self::reject(operation, "signer lacks data provider role"));
                }
                let id = state.next_mrv_id;
                state.next_mrv_id += 1;
                let timestamp = state.tick();
                state.mrv_records.insert(
                    id,
                    RawMrvRecord {
                        id,
                        project_id: project_id.clone(),
                        timestamp,
                        report_type: report_type.clone(),
                        data_hash,
                        methodology,
                        reporter: signer.to_string(),
                        verified: false,
                        co2_measured,
                        satellite_data,
                        sensor_data,
                        status: 0,
                    },
                );
                state.trail(&project_id).mrv_record_ids.push(id);
                let _ = self.events.send(LedgerEvent::MrvRecordCreated {
                    id,
                    project_id,
                    reporter: signer.to_string(),
                    report_type: ReportType::parse(&report_type).expect("mock report type"),
                    timestamp,
                });
            }

            ContractCall::VerifyMrvRecord {
                mrv_record_id,
                approved,
                comments,
                criteria_hash,
                confidence_score,
                ai_analysis,
            } => {
                if !state.has_role("verifier", signer) {
                    return Err(Self::reject(operation, "signer lacks verifier role"));
                }
                let project_id = match state.mrv_records.get(&mrv_record_id) {
                    Some(record) => record.project_id.clone(),
                    None => return Err(Self::reject(operation, "unknown mrv record")),
                };
                let id = state.next_verification_id;
                state.next_verification_id += 1;
                let timestamp = state.tick();
                state.verification_events.insert(
                    id,
                    RawVerificationEvent {
                        id,
                        project_id: project_id.clone(),
                        mrv_record_id,
                        verifier: signer.to_string(),
                        timestamp,
                        approved,
                        comments,
                        criteria_hash,
                        confidence_score,
                        ai_analysis,
                    },
                );
                let record = state
                    .mrv_records
                    .get_mut(&mrv_record_id)
                    .expect("record existence checked above");
                if approved {
                    record.verified = true;
                    record.status = 1;
                } else {
                    record.status = 2;
                }
                state.trail(&project_id).verification_event_ids.push(id);
                let _ = self.events.send(LedgerEvent::VerificationCompleted {
                    id,
                    project_id,
                    mrv_record_id,
                    verifier: signer.to_string(),
                    approved,
                    confidence_score,
                });
            }

            ContractCall::CreateAuditRecord {
                project_id,
                audit_type,
                findings,
                evidence_hash,
                result,
                recommendations,
            } => {
                if !state.has_role("auditor", signer) {
                    return Err(Self::reject(operation, "signer lacks auditor role"));
                }
                let id = state.next_audit_id;
                state.next_audit_id += 1;
                let timestamp = state.tick();
                state.audit_records.insert(
                    id,
                    RawAuditRecord {
                        id,
                        project_id: project_id.clone(),
                        timestamp,
                        auditor: signer.to_string(),
                        audit_type: audit_type.clone(),
                        findings,
                        evidence_hash,
                        result,
                        recommendations,
                        remediated: false,
                        follow_up_date: 0,
                    },
                );
                state.trail(&project_id).audit_record_ids.push(id);
                let _ = self.events.send(LedgerEvent::AuditRecordCreated {
                    id,
                    project_id,
                    auditor: signer.to_string(),
                    audit_type: AuditType::parse(&audit_type).expect("mock audit type"),
                    timestamp,
                });
            }

            ContractCall::UpdateCompliance {
                project_id,
                standard,
                compliant,
                certification_hash,
                expiry_date,
            } => {
                let timestamp = state.tick();
                state.compliance.insert(
                    (project_id.clone(), standard.clone()),
                    RawComplianceRecord {
                        project_id: project_id.clone(),
                        standard: standard.clone(),
                        compliant,
                        last_checked: timestamp,
                        certification_hash,
                        expiry_date,
                    },
                );
                let _ = self.events.send(LedgerEvent::ComplianceUpdated {
                    project_id,
                    standard,
                    compliant,
                    timestamp,
                });
            }

            ContractCall::MarkAuditRemediated { audit_id } => {
                if !state.has_role("auditor", signer) {
                    return Err(Self::reject(operation, "signer lacks auditor role"));
                }
                match state.audit_records.get_mut(&audit_id) {
                    Some(audit) => audit.remediated = true,
                    None => return Err(Self::reject(operation, "unknown audit record")),
                }
            }

            ContractCall::GrantVerifierRole { account } => {
                state.roles.insert(("verifier", account));
            }
            ContractCall::GrantAuditorRole { account } => {
                state.roles.insert(("auditor", account));
            }
            ContractCall::GrantProjectOwnerRole { account } => {
                state.roles.insert(("project_owner", account));
            }
            ContractCall::GrantDataProviderRole { account } => {
                state.roles.insert(("data_provider", account));
            }
        }

        let tx = state.next_tx;
        state.next_tx += 1;
        Ok(format!("0xtx{tx:04}"))
    }
}

#[async_trait]
impl LedgerTransport for MockLedger {
    async fn submit(&self, request: SubmitRequest) -> Result<TxId> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RegistryError::LedgerUnavailable {
                operation: request.call.method_name(),
                reason: "simulated outage".to_string(),
            });
        }
        assert_eq!(request.contract, self.address, "write sent to wrong contract");
        self.apply(&request.signer, request.call)
    }

    async fn query(&self, request: QueryRequest) -> Result<QueryReply> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        if self.offline.load(Ordering::SeqCst) {
            return Err(RegistryError::LedgerUnavailable {
                operation: "query",
                reason: "simulated outage".to_string(),
            });
        }
        assert_eq!(request.contract, self.address, "query sent to wrong contract");

        let state = self.state.lock().unwrap();
        let reply = match request.query {
            ContractQuery::MrvRecord { id } => {
                QueryReply::MrvRecord(state.mrv_records.get(&id).cloned().unwrap_or_default())
            }
            ContractQuery::AuditRecord { id } => {
                QueryReply::AuditRecord(state.audit_records.get(&id).cloned().unwrap_or_default())
            }
            ContractQuery::VerificationEvent { id } => QueryReply::VerificationEvent(
                state
                    .verification_events
                    .get(&id)
                    .cloned()
                    .unwrap_or_default(),
            ),
            ContractQuery::ProjectAuditTrail { project_id } => QueryReply::ProjectAuditTrail(
                state.trails.get(&project_id).cloned().unwrap_or_default(),
            ),
            ContractQuery::ProjectCompliance {
                project_id,
                standards,
            } => QueryReply::ProjectCompliance(
                standards
                    .iter()
                    .filter_map(|standard| {
                        state
                            .compliance
                            .get(&(project_id.clone(), standard.clone()))
                            .cloned()
                    })
                    .collect(),
            ),
        };
        Ok(reply)
    }

    fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }
}
