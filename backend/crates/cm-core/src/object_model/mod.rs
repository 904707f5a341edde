//! Boundary to the content platform's object model.
//!
//! The migration engine never interprets object payloads. Everything it
//! needs to know about an object (its children, its ancestors, how to
//! serialize, validate and install it) is asked through [`ObjectModel`].

pub mod error;
pub mod install_outcome;
pub mod object_validation;

use crate::{
    ArchiveDetail, Dependency, DependencyRef, IdentityMap, InstallOutcome, ObjectModelResult,
    ObjectValidation, PolicySettings,
};

use async_trait::async_trait;

#[async_trait]
pub trait ObjectModel: Send + Sync {
    /// Objects of `object_type` that can serve as package roots.
    async fn list_deployable(&self, object_type: &str) -> ObjectModelResult<Vec<Dependency>>;

    /// Resolve a reference on the source server.
    async fn lookup(&self, reference: &DependencyRef) -> ObjectModelResult<Dependency>;

    /// Direct children of `dependency`, in model order.
    ///
    /// Fails with `NotFound` if a referenced child no longer exists.
    async fn children(&self, dependency: &Dependency) -> ObjectModelResult<Vec<Dependency>> {
        let mut children = Vec::with_capacity(dependency.children.len());
        for reference in &dependency.children {
            children.push(self.lookup(reference).await?);
        }
        Ok(children)
    }

    /// Structural ancestors (containers) of `dependency` on the source server.
    async fn ancestors(&self, dependency: &Dependency) -> ObjectModelResult<Vec<DependencyRef>>;

    async fn serialize(&self, dependency: &Dependency) -> ObjectModelResult<Vec<u8>>;

    /// Whether the referenced object exists on the target, after remapping.
    async fn exists_on_target(
        &self,
        reference: &DependencyRef,
        id_map: Option<&IdentityMap>,
    ) -> ObjectModelResult<bool>;

    /// Check one archived object against the target's current state.
    async fn validate(
        &self,
        detail: &ArchiveDetail,
        mapped_target: Option<&str>,
    ) -> ObjectModelResult<ObjectValidation>;

    async fn install(
        &self,
        detail: &ArchiveDetail,
        payload: &[u8],
        id_map: Option<&IdentityMap>,
        policy: &PolicySettings,
    ) -> ObjectModelResult<InstallOutcome>;

    async fn flush_caches(&self) -> ObjectModelResult<()>;
}
