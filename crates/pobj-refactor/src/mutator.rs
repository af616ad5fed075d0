//! Adding the generated unit to a project
//!
//! All mutation goes through [`Solution`]'s functional updates, so the
//! snapshot passed in stays valid whatever happens here.

use pobj_config::CollisionPolicy;
use pobj_foundation::{
    ensure_not_cancelled, CancellationToken, DocumentId, Project, ProjectId, RefactorError,
    RefactorResult, Solution,
};
use tracing::{debug, info};

/// Upper bound on `<ClassName>N` candidates tried by [`CollisionPolicy::Rename`]
const MAX_RENAME_ATTEMPTS: usize = 1000;

/// `<class_name>.<extension>`
pub fn unit_file_name(class_name: &str, extension: &str) -> String {
    format!("{}.{}", class_name, extension)
}

/// Add a new compilation unit to `project_id`
///
/// Fails with [`RefactorError::NameCollision`] when the folder already holds a
/// file of that name, and with [`RefactorError::Cancelled`] when `cancel`
/// fired; in both cases nothing is committed.
pub fn add_unit(
    solution: &Solution,
    project_id: ProjectId,
    file_name: &str,
    text: &str,
    folders: &[String],
    cancel: &CancellationToken,
) -> RefactorResult<(Solution, DocumentId)> {
    let project = solution
        .project(project_id)
        .ok_or_else(|| RefactorError::project_not_found(project_id))?;
    ensure_free(project, file_name, folders)?;

    ensure_not_cancelled(cancel, "mutate")?;

    let (updated, document) =
        solution.with_new_document(project_id, file_name, text, folders.to_vec())?;

    info!(
        project = %project.name,
        file = %file_name,
        folder = %folders.join("/"),
        version = updated.version(),
        "Added compilation unit"
    );
    Ok((updated, document))
}

/// Pick the class name to generate, honoring the collision policy
///
/// With [`CollisionPolicy::Abort`] the configured name is returned unchanged;
/// [`add_unit`] reports the collision later. With [`CollisionPolicy::Rename`]
/// the first free `<base>N` (N = 1, 2, ...) is chosen.
pub fn resolve_class_name(
    project: &Project,
    base: &str,
    extension: &str,
    folders: &[String],
    policy: CollisionPolicy,
) -> RefactorResult<String> {
    if policy == CollisionPolicy::Abort || is_free(project, &unit_file_name(base, extension), folders)
    {
        return Ok(base.to_string());
    }

    for n in 1..=MAX_RENAME_ATTEMPTS {
        let candidate = format!("{}{}", base, n);
        if is_free(project, &unit_file_name(&candidate, extension), folders) {
            debug!(requested = %base, chosen = %candidate, "Renamed to avoid file collision");
            return Ok(candidate);
        }
    }

    Err(RefactorError::name_collision(
        unit_file_name(base, extension),
        folders.join("/"),
    ))
}

fn is_free(project: &Project, file_name: &str, folders: &[String]) -> bool {
    project.find_document(file_name, folders).is_none()
}

fn ensure_free(project: &Project, file_name: &str, folders: &[String]) -> RefactorResult<()> {
    if is_free(project, file_name, folders) {
        Ok(())
    } else {
        Err(RefactorError::name_collision(file_name, folders.join("/")))
    }
}
