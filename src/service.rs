//! Application-facing registry service
//!
//! The single entry point the rest of an application depends on. A service
//! is an explicit instance constructed with its configuration and transport;
//! there is no module-level singleton. `initialize()` binds the gateway to
//! the configured contract address, and every ledger-touching operation
//! before that fails fast with `ContractNotInitialized`.
//!
//! Writes validate their params structurally, then delegate; the ledger
//! remains the authoritative permission enforcer, so no local role checks
//! are performed before submission. Every write is attributed to an explicit
//! signing identity supplied by the caller - there is no default signer.

use std::sync::{Arc, RwLock};

use tracing::info;

use crate::config::RegistryConfig;
use crate::error::{RegistryError, Result};
use crate::events::{EventHandlers, EventRouter};
use crate::gateway::LedgerGateway;
use crate::numeric::encode_fixed_point;
use crate::transport::LedgerTransport;
use crate::types::{
    AuditRecord, ComplianceRecord, CreateAuditParams, CreateMrvParams, MrvRecord,
    ProjectAuditTrail, RoleKind, TxId, UpdateComplianceParams, VerificationEvent, VerifyMrvParams,
};

/// Orchestrates gateway writes/reads and event subscriptions for one
/// deployed registry contract.
///
/// Rebinding to a different contract is not supported; construct a new
/// instance instead. The gateway binding is immutable once initialized, so
/// concurrent callers share the service freely.
pub struct MrvRegistryService {
    config: RegistryConfig,
    transport: Arc<dyn LedgerTransport>,
    gateway: RwLock<Option<Arc<LedgerGateway>>>,
    events: EventRouter,
}

impl MrvRegistryService {
    /// Create an uninitialized service. The event router starts consuming
    /// the transport feed immediately; ledger operations stay unavailable
    /// until [`initialize`](Self::initialize).
    pub fn new(config: RegistryConfig, transport: Arc<dyn LedgerTransport>) -> Self {
        let events = EventRouter::new(transport.subscribe());
        Self {
            config,
            transport,
            gateway: RwLock::new(None),
            events,
        }
    }

    /// Bind the gateway to the configured contract address.
    ///
    /// Fails with `ContractNotInitialized` when the configuration carries no
    /// address, and with `InvalidParams` when already initialized.
    pub fn initialize(&self) -> Result<()> {
        let mut slot = self.gateway.write().unwrap();
        if slot.is_some() {
            return Err(RegistryError::InvalidParams(
                "service already initialized; construct a new instance to rebind".into(),
            ));
        }

        let gateway = LedgerGateway::new(
            Arc::clone(&self.transport),
            self.config.contract_address.clone(),
        )?;
        info!(contract = %self.config.contract_address, "registry service bound to contract");
        *slot = Some(Arc::new(gateway));
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.gateway.read().unwrap().is_some()
    }

    fn gateway(&self) -> Result<Arc<LedgerGateway>> {
        self.gateway
            .read()
            .unwrap()
            .clone()
            .ok_or(RegistryError::ContractNotInitialized)
    }

    // ==================== Writes ====================

    /// Create an MRV record under the given signing identity.
    pub async fn create_mrv_record(
        &self,
        signer: &str,
        params: &CreateMrvParams,
    ) -> Result<TxId> {
        let gateway = self.gateway()?;
        require_signer(signer)?;
        require_field("project_id", &params.project_id)?;
        require_field("data_hash", &params.data_hash)?;
        require_field("methodology", &params.methodology)?;
        if params.co2_measured.trim().is_empty() {
            return Err(RegistryError::InvalidParams("co2_measured is required".into()));
        }
        // Must parse as a non-negative decimal before anything hits the wire
        encode_fixed_point(&params.co2_measured).map_err(|_| {
            RegistryError::InvalidParams(format!(
                "co2_measured must be a non-negative decimal, got {:?}",
                params.co2_measured
            ))
        })?;

        gateway.create_mrv_record(signer, params).await
    }

    /// Submit a verification judgment on an existing MRV record.
    ///
    /// The confidence score must already be computed by the caller, via
    /// [`crate::scoring::compute_confidence_score`] or a manual override;
    /// the service never computes it implicitly.
    pub async fn verify_mrv_record(
        &self,
        signer: &str,
        params: &VerifyMrvParams,
    ) -> Result<TxId> {
        let gateway = self.gateway()?;
        require_signer(signer)?;
        if params.mrv_record_id == 0 {
            return Err(RegistryError::InvalidParams(
                "mrv_record_id must reference an existing record".into(),
            ));
        }
        require_field("comments", &params.comments)?;
        require_field("criteria_hash", &params.criteria_hash)?;
        if params.confidence_score > 100 {
            return Err(RegistryError::InvalidParams(format!(
                "confidence_score must be within 0-100, got {}",
                params.confidence_score
            )));
        }

        gateway.verify_mrv_record(signer, params).await
    }

    pub async fn create_audit_record(
        &self,
        signer: &str,
        params: &CreateAuditParams,
    ) -> Result<TxId> {
        let gateway = self.gateway()?;
        require_signer(signer)?;
        require_field("project_id", &params.project_id)?;
        require_field("findings", &params.findings)?;
        require_field("evidence_hash", &params.evidence_hash)?;
        require_field("recommendations", &params.recommendations)?;

        gateway.create_audit_record(signer, params).await
    }

    pub async fn update_compliance(
        &self,
        signer: &str,
        params: &UpdateComplianceParams,
    ) -> Result<TxId> {
        let gateway = self.gateway()?;
        require_signer(signer)?;
        require_field("project_id", &params.project_id)?;
        require_field("standard", &params.standard)?;
        require_field("certification_hash", &params.certification_hash)?;

        gateway.update_compliance(signer, params).await
    }

    /// Mark an audit's findings as remediated. One-way: the ledger never
    /// reverts the flag.
    pub async fn mark_audit_remediated(&self, signer: &str, audit_id: u64) -> Result<TxId> {
        let gateway = self.gateway()?;
        require_signer(signer)?;
        if audit_id == 0 {
            return Err(RegistryError::InvalidParams(
                "audit_id must reference an existing audit".into(),
            ));
        }

        gateway.mark_audit_remediated(signer, audit_id).await
    }

    pub async fn grant_role(&self, signer: &str, role: RoleKind, account: &str) -> Result<TxId> {
        let gateway = self.gateway()?;
        require_signer(signer)?;
        require_field("account", account)?;

        gateway.grant_role(signer, role, account).await
    }

    // ==================== Reads ====================

    pub async fn get_mrv_record(&self, id: u64) -> Result<Option<MrvRecord>> {
        self.gateway()?.get_mrv_record(id).await
    }

    pub async fn get_audit_record(&self, id: u64) -> Result<Option<AuditRecord>> {
        self.gateway()?.get_audit_record(id).await
    }

    pub async fn get_verification_event(&self, id: u64) -> Result<Option<VerificationEvent>> {
        self.gateway()?.get_verification_event(id).await
    }

    pub async fn get_project_audit_trail(&self, project_id: &str) -> Result<ProjectAuditTrail> {
        self.gateway()?.get_project_audit_trail(project_id).await
    }

    pub async fn get_project_compliance(
        &self,
        project_id: &str,
        standards: &[String],
    ) -> Result<Vec<ComplianceRecord>> {
        self.gateway()?
            .get_project_compliance(project_id, standards)
            .await
    }

    // ==================== Events ====================

    /// Install event handlers. Subscription is independent of the contract
    /// binding, so this works before `initialize()`; catch-up for events
    /// emitted earlier goes through the read operations.
    pub fn setup_event_listeners(&self, handlers: EventHandlers) {
        self.events.install(handlers);
    }

    /// Direct access to the event router, for per-kind registration and the
    /// handler error hook.
    pub fn event_router(&self) -> &EventRouter {
        &self.events
    }
}

fn require_signer(signer: &str) -> Result<()> {
    if signer.trim().is_empty() {
        return Err(RegistryError::InvalidParams(
            "every write requires an explicit signing identity".into(),
        ));
    }
    Ok(())
}

fn require_field(name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(RegistryError::InvalidParams(format!("{name} is required")));
    }
    Ok(())
}
