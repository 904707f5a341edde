//! Depth-first discovery of everything a package root depends on.

use crate::{EngineError, Result as EngineErrorResult};

use cm_core::{Dependency, DependencyKey, Inclusion, ObjectModel, ObjectModelError, TreeContext};

use log::trace;
use tokio_util::sync::CancellationToken;

struct Frame {
    key: DependencyKey,
    children: std::vec::IntoIter<Dependency>,
}

/// Walk the graph below `root`, including every reachable key not already
/// known to `tree`.
///
/// Children are visited in the order the object model returns them. A known
/// key (included or suppressed) is never expanded again, which is what stops
/// the walk on cyclic graphs. Returns the number of newly included keys.
pub async fn add_missing_dependencies(
    root: &Dependency,
    tree: &mut TreeContext,
    model: &dyn ObjectModel,
    cancel: &CancellationToken,
) -> EngineErrorResult<usize> {
    let root_children = children_of(model, root).await?;
    let mut stack = vec![Frame {
        key: root.key(),
        children: root_children.into_iter(),
    }];
    let mut added = 0;

    while let Some(frame) = stack.last_mut() {
        let Some(child) = frame.children.next() else {
            stack.pop();
            continue;
        };
        let parent = frame.key.clone();

        if cancel.is_cancelled() {
            return Err(EngineError::cancelled());
        }

        let key = child.key();
        match tree.include(&key, &parent) {
            Inclusion::AlreadyKnown => continue,
            Inclusion::Suppressed => {
                trace!("Suppressed {key} (reached from {parent})");
                continue;
            }
            Inclusion::Included => {}
        }

        let ancestors = model
            .ancestors(&child)
            .await
            .map_err(|e| resolution_error(&key, e))?;
        tree.add_ancestors(&key, &ancestors);

        let grandchildren = children_of(model, &child).await?;
        trace!("Included {key} ({} children)", grandchildren.len());
        added += 1;

        stack.push(Frame {
            key,
            children: grandchildren.into_iter(),
        });
    }

    Ok(added)
}

async fn children_of(
    model: &dyn ObjectModel,
    dependency: &Dependency,
) -> EngineErrorResult<Vec<Dependency>> {
    model
        .children(dependency)
        .await
        .map_err(|e| resolution_error(&dependency.key(), e))
}

#[track_caller]
pub(crate) fn resolution_error(key: &DependencyKey, error: ObjectModelError) -> EngineError {
    if error.is_not_found() {
        EngineError::resolution(key, &error)
    } else {
        EngineError::from(error)
    }
}
