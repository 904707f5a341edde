pub mod export_job;
pub mod import_job;
pub mod validation_job;

use cm_core::{ImportDescriptor, ValidationResults};

use log::warn;

/// Attach stored validation results to the matching packages.
pub(crate) fn attach_results(descriptor: &mut ImportDescriptor, stored: Vec<ValidationResults>) {
    for results in stored {
        match descriptor
            .packages
            .iter_mut()
            .find(|package| package.root == results.package)
        {
            Some(package) => package.results = Some(results),
            None => warn!(
                "Stored validation results for {} match no package in {}",
                results.package, descriptor.archive_ref
            ),
        }
    }
}
