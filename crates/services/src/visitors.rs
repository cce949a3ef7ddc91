//! Visitor passes issued by residents.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use domains::{
    DomainError, NewVisitorPass, RecordId, Result, Session, VisitorPass, VisitorPassStatus,
};
use serde::{Deserialize, Serialize};

use crate::{observe, required, Store};

#[derive(Debug, Clone)]
pub struct PassRequest {
    pub building_id: RecordId,
    pub visitor_name: String,
    pub valid_from: DateTime<Utc>,
    pub valid_to: DateTime<Utc>,
}

/// The status tabs of the visitor page. `Expired` also holds revoked
/// passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassTab {
    Active,
    Used,
    Expired,
}

impl PassTab {
    pub fn of(status: VisitorPassStatus) -> Self {
        match status {
            VisitorPassStatus::Active => PassTab::Active,
            VisitorPassStatus::Used => PassTab::Used,
            VisitorPassStatus::Expired | VisitorPassStatus::Revoked => PassTab::Expired,
        }
    }

    pub fn shows(self, pass: &VisitorPass) -> bool {
        Self::of(pass.status) == self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitorPassCounts {
    pub all: usize,
    pub active: usize,
    pub used: usize,
    /// Expired and revoked together
    pub expired: usize,
}

impl VisitorPassCounts {
    pub fn tally(passes: &[VisitorPass]) -> Self {
        let mut counts = Self {
            all: passes.len(),
            ..Self::default()
        };
        for p in passes {
            match PassTab::of(p.status) {
                PassTab::Active => counts.active += 1,
                PassTab::Used => counts.used += 1,
                PassTab::Expired => counts.expired += 1,
            }
        }
        counts
    }
}

pub struct VisitorService {
    store: Arc<Store>,
}

impl VisitorService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn issue_pass(&self, session: &Session, request: PassRequest) -> Result<VisitorPass> {
        let visitor_name = required("visitor name", &request.visitor_name)?;
        if request.valid_to <= request.valid_from {
            return Err(DomainError::validation(
                "the pass must end after it starts",
            ));
        }

        let pass = observe(
            "visitors.issue",
            self.store
                .add_visitor_pass(NewVisitorPass {
                    building_id: request.building_id,
                    resident_id: session.user_id.clone(),
                    visitor_name,
                    valid_from: request.valid_from,
                    valid_to: request.valid_to,
                })
                .await,
        )?;
        tracing::info!(pass = %pass.id, resident = %session.user_id, "visitor pass issued");
        Ok(pass)
    }

    pub async fn list(&self, building: Option<&RecordId>) -> Result<Vec<VisitorPass>> {
        observe("visitors.list", self.store.list_visitor_passes(building).await)
    }

    /// Case-insensitive match on the visitor's name, optionally limited to
    /// one status tab.
    pub async fn search(
        &self,
        building: Option<&RecordId>,
        tab: Option<PassTab>,
        term: &str,
    ) -> Result<Vec<VisitorPass>> {
        let needle = term.trim().to_lowercase();
        let passes = self.list(building).await?;
        Ok(passes
            .into_iter()
            .filter(|p| tab.map_or(true, |t| t.shows(p)))
            .filter(|p| p.visitor_name.to_lowercase().contains(&needle))
            .collect())
    }

    /// Looks a pass up by the code shown at the gate. Case-insensitive; the
    /// `PASS-` prefix is optional. A code shared by two passes is rejected
    /// rather than resolved to either.
    pub async fn find_by_code(&self, code: &str) -> Result<Option<VisitorPass>> {
        let code = code.trim().to_uppercase();
        let wanted = if code.starts_with("PASS-") {
            code
        } else {
            format!("PASS-{code}")
        };
        let mut matches = self
            .list(None)
            .await?
            .into_iter()
            .filter(|p| p.pass_code() == wanted);
        let found = matches.next();
        if matches.next().is_some() {
            tracing::warn!(code = %wanted, "pass code matches several passes");
            return Err(DomainError::validation(format!(
                "{wanted} matches more than one pass"
            )));
        }
        Ok(found)
    }

    pub async fn revoke(&self, id: &RecordId) -> Result<Option<VisitorPass>> {
        observe("visitors.revoke", self.store.revoke_visitor_pass(id).await)
    }

    pub async fn status_counts(&self, building: Option<&RecordId>) -> Result<VisitorPassCounts> {
        Ok(VisitorPassCounts::tally(&self.list(building).await?))
    }
}
