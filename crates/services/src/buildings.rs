//! Buildings managed by the dashboard.

use std::sync::Arc;

use domains::{Building, DomainError, NewBuilding, RecordId, Result, Session};

use crate::{observe, required, Store};

pub struct BuildingService {
    store: Arc<Store>,
}

impl BuildingService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Result<Vec<Building>> {
        observe("buildings.list", self.store.list_buildings().await)
    }

    pub async fn find(&self, id: &RecordId) -> Result<Option<Building>> {
        observe("buildings.find", self.store.find_building(id).await)
    }

    /// Administrators only; residents get `DomainError::Forbidden`.
    pub async fn register(&self, session: &Session, name: &str, address: &str) -> Result<Building> {
        if !session.is_admin() {
            tracing::warn!(
                user = %session.user_id,
                role = ?session.role,
                "building registration refused"
            );
            return Err(DomainError::forbidden(
                "only building administrators can add buildings",
            ));
        }
        let input = NewBuilding {
            name: required("name", name)?,
            address: required("address", address)?,
        };
        let building = observe("buildings.register", self.store.add_building(input).await)?;
        tracing::info!(building = %building.id, name = %building.name, "building registered");
        Ok(building)
    }

    /// Case-insensitive match on name or address.
    pub async fn search(&self, term: &str) -> Result<Vec<Building>> {
        let needle = term.trim().to_lowercase();
        Ok(self
            .list()
            .await?
            .into_iter()
            .filter(|b| {
                b.name.to_lowercase().contains(&needle)
                    || b.address.to_lowercase().contains(&needle)
            })
            .collect())
    }
}
