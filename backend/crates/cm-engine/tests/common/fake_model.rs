use cm_core::{
    ArchiveDetail, Dependency, DependencyKey, DependencyKind, DependencyRef, ErrorLocation,
    IdentityMap, InstallAction, InstallOutcome, ObjectModel, ObjectModelError, ObjectModelResult,
    ObjectValidation, PolicySettings,
};
use cm_engine::CancellationToken;

use std::collections::{HashMap, HashSet};
use std::panic::Location;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

pub fn key(value: &str) -> DependencyKey {
    DependencyKey::parse(value).expect("valid test key")
}

pub fn reference(value: &str) -> DependencyRef {
    DependencyRef::from(&key(value))
}

#[derive(Clone)]
struct FakeObject {
    dependency: Dependency,
    ancestors: Vec<DependencyRef>,
}

/// In-memory source graph plus a target keyed by `<type>:<target id>`.
#[derive(Default)]
pub struct FakeObjectModel {
    objects: HashMap<DependencyKey, FakeObject>,
    target: Mutex<HashSet<DependencyKey>>,
    failing_install: HashSet<DependencyKey>,
    failing_storage: HashSet<DependencyKey>,
    failing_serialize: HashSet<DependencyKey>,
    failing_validation: HashSet<DependencyKey>,
    cancel_on_serialize: Option<(DependencyKey, CancellationToken)>,
    pub validate_calls: AtomicUsize,
    pub install_calls: AtomicUsize,
    pub flushes: AtomicUsize,
}

impl FakeObjectModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a package root with the given children keys.
    pub fn package(self, key_str: &str, name: &str, children: &[&str]) -> Self {
        self.add(key_str, name, DependencyKind::DeployableElement, children)
    }

    pub fn object(self, key_str: &str, name: &str, children: &[&str]) -> Self {
        self.add(key_str, name, DependencyKind::Object, children)
    }

    pub fn ancestors(mut self, key_str: &str, ancestors: &[&str]) -> Self {
        if let Some(object) = self.objects.get_mut(&key(key_str)) {
            object.ancestors = ancestors.iter().map(|a| reference(a)).collect();
        }
        self
    }

    pub fn on_target(self, key_str: &str) -> Self {
        self.target.lock().unwrap().insert(key(key_str));
        self
    }

    pub fn fail_install(mut self, key_str: &str) -> Self {
        self.failing_install.insert(key(key_str));
        self
    }

    /// Installing the key fails with a target storage error.
    pub fn fail_storage(mut self, key_str: &str) -> Self {
        self.failing_storage.insert(key(key_str));
        self
    }

    pub fn fail_serialize(mut self, key_str: &str) -> Self {
        self.failing_serialize.insert(key(key_str));
        self
    }

    pub fn fail_validation(mut self, key_str: &str) -> Self {
        self.failing_validation.insert(key(key_str));
        self
    }

    pub fn cancel_after_serializing(mut self, key_str: &str, token: CancellationToken) -> Self {
        self.cancel_on_serialize = Some((key(key_str), token));
        self
    }

    pub fn target_contains(&self, key_str: &str) -> bool {
        self.target.lock().unwrap().contains(&key(key_str))
    }

    pub fn target_len(&self) -> usize {
        self.target.lock().unwrap().len()
    }

    fn add(mut self, key_str: &str, name: &str, kind: DependencyKind, children: &[&str]) -> Self {
        let k = key(key_str);
        let dependency = Dependency::new(k.object_type(), k.id(), name, kind)
            .with_children(children.iter().map(|c| reference(c)).collect());
        self.objects.insert(
            k,
            FakeObject {
                dependency,
                ancestors: Vec::new(),
            },
        );
        self
    }
}

#[track_caller]
fn not_found(key: &DependencyKey) -> ObjectModelError {
    ObjectModelError::NotFound {
        key: key.to_string(),
        location: ErrorLocation::from(Location::caller()),
    }
}

#[async_trait]
impl ObjectModel for FakeObjectModel {
    async fn list_deployable(&self, object_type: &str) -> ObjectModelResult<Vec<Dependency>> {
        let mut found: Vec<Dependency> = self
            .objects
            .values()
            .filter(|o| {
                o.dependency.object_type == object_type
                    && o.dependency.kind == DependencyKind::DeployableElement
            })
            .map(|o| o.dependency.clone())
            .collect();
        found.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(found)
    }

    async fn lookup(&self, reference: &DependencyRef) -> ObjectModelResult<Dependency> {
        let key = reference.key();
        self.objects
            .get(&key)
            .map(|o| o.dependency.clone())
            .ok_or_else(|| not_found(&key))
    }

    async fn ancestors(&self, dependency: &Dependency) -> ObjectModelResult<Vec<DependencyRef>> {
        Ok(self
            .objects
            .get(&dependency.key())
            .map(|o| o.ancestors.clone())
            .unwrap_or_default())
    }

    async fn serialize(&self, dependency: &Dependency) -> ObjectModelResult<Vec<u8>> {
        let key = dependency.key();
        if self.failing_serialize.contains(&key) {
            return Err(ObjectModelError::Storage {
                message: format!("cannot serialize {key}"),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if let Some((trigger, token)) = &self.cancel_on_serialize {
            if trigger == &key {
                token.cancel();
            }
        }
        Ok(dependency.name.clone().into_bytes())
    }

    async fn exists_on_target(
        &self,
        reference: &DependencyRef,
        id_map: Option<&IdentityMap>,
    ) -> ObjectModelResult<bool> {
        let source_key = reference.key();
        let target_id = id_map
            .and_then(|map| map.target_id(&source_key))
            .unwrap_or(reference.id.as_str());
        let target_key = DependencyKey::new(&reference.object_type, target_id);
        Ok(self.target.lock().unwrap().contains(&target_key))
    }

    async fn validate(
        &self,
        detail: &ArchiveDetail,
        _mapped_target: Option<&str>,
    ) -> ObjectModelResult<ObjectValidation> {
        self.validate_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_validation.contains(&detail.key) {
            return Ok(ObjectValidation::failed(format!("{} is incompatible", detail.key)));
        }
        Ok(ObjectValidation::ok())
    }

    async fn install(
        &self,
        detail: &ArchiveDetail,
        _payload: &[u8],
        id_map: Option<&IdentityMap>,
        policy: &PolicySettings,
    ) -> ObjectModelResult<InstallOutcome> {
        self.install_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_install.contains(&detail.key) {
            return Err(ObjectModelError::Incompatible {
                message: format!("cannot install {}", detail.key),
                location: ErrorLocation::from(Location::caller()),
            });
        }
        if self.failing_storage.contains(&detail.key) {
            return Err(ObjectModelError::Storage {
                message: format!("disk full writing {}", detail.key),
                location: ErrorLocation::from(Location::caller()),
            });
        }

        let target_id = id_map
            .and_then(|map| map.target_id(&detail.key))
            .unwrap_or(detail.id.as_str())
            .to_string();
        let target_key = DependencyKey::new(&detail.object_type, &target_id);

        let mut target = self.target.lock().unwrap();
        let action = match (target.contains(&target_key), policy.overwrite_existing, policy.create_missing) {
            (true, true, _) => InstallAction::Updated,
            (true, false, _) => InstallAction::Skipped,
            (false, _, true) => {
                target.insert(target_key);
                InstallAction::Created
            }
            (false, _, false) => InstallAction::Skipped,
        };

        Ok(InstallOutcome { target_id, action })
    }

    async fn flush_caches(&self) -> ObjectModelResult<()> {
        self.flushes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
