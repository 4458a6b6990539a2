//! Error types for the injection container.

use std::sync::Arc;

use thiserror::Error;

/// Boxed error returned by lifecycle hooks.
pub type DynError = Box<dyn std::error::Error + Send + Sync>;

/// Injection errors
///
/// Every variant is terminal for the call that produced it. Within a single
/// [`Container::inject`](crate::Container::inject) pass the first error aborts the
/// remaining walk; fields assigned before the error stay assigned.
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::DiError;
///
/// let duplicate = DiError::DuplicateName("db".to_string());
/// assert_eq!(duplicate.to_string(), "Object name 'db' is already registered");
///
/// let cycle = DiError::CycleDetected { path: vec!["a".into(), "b".into(), "a".into()] };
/// assert_eq!(cycle.to_string(), "Dependency cycle detected: a -> b -> a");
/// ```
#[derive(Error, Debug, Clone)]
pub enum DiError {
    /// Registration name was empty
    #[error("Object name must not be empty")]
    InvalidName,
    /// Registration target cannot be described as a record with settable fields
    #[error("Object '{name}' cannot be registered: {reason}")]
    InvalidInstanceKind { name: String, reason: String },
    /// Name collision at registration
    #[error("Object name '{0}' is already registered")]
    DuplicateName(String),
    /// Two strategies share a name
    #[error("Strategy named '{0}' already exists")]
    DuplicateStrategy(String),
    /// Strategy name not registered (strict mode only)
    #[error("Field '{field}' of '{object}' requests unknown strategy '{strategy}'")]
    UnknownStrategy {
        object: String,
        field: String,
        strategy: String,
    },
    /// No valid topological order exists
    #[error("Dependency cycle detected: {}", path.join(" -> "))]
    CycleDetected { path: Vec<String> },
    /// Type-only resolution found more than one provider
    #[error("Field '{field}' of '{object}' matches several objects of type '{target}': {}", candidates.join(", "))]
    AmbiguousMatch {
        object: String,
        field: String,
        target: &'static str,
        candidates: Vec<String>,
    },
    /// Nothing matched a required field
    #[error("Field '{field}' of '{object}' requires '{requested}' but nothing matched")]
    MissingRequiredDependency {
        object: String,
        field: String,
        requested: String,
    },
    /// Candidate found but not assignable to the field
    #[error("Field '{field}' of '{object}' expects '{expected}' but '{found}' cannot be injected as it")]
    TypeMismatch {
        object: String,
        field: String,
        expected: &'static str,
        found: &'static str,
    },
    /// Field already holds a different object
    #[error("Field '{field}' of '{object}' is already assigned to a different object")]
    FieldAlreadyAssigned { object: String, field: String },
    /// After-injection hook failed
    #[error("After-inject hook of '{object}' failed: {source}")]
    AfterInject {
        object: String,
        #[source]
        source: Arc<dyn std::error::Error + Send + Sync>,
    },
    /// Container already ran its injection pass
    #[error("Container already ran its injection pass")]
    ContainerSealed,
    /// Graph snapshot could not be serialized
    #[error("Graph export failed: {0}")]
    Export(String),
}

/// Result type for injection operations
///
/// # Examples
///
/// ```rust
/// use ferrous_inject::{DiError, DiResult};
///
/// fn check(name: &str) -> DiResult<()> {
///     if name.is_empty() {
///         return Err(DiError::InvalidName);
///     }
///     Ok(())
/// }
///
/// assert!(check("a").is_ok());
/// assert!(matches!(check(""), Err(DiError::InvalidName)));
/// ```
pub type DiResult<T> = Result<T, DiError>;
