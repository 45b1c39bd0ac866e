use thiserror::Error;

/// Tree store and edit operation errors.
///
/// Structural invariant rejections originate from internal call sites and
/// are safe to ignore; nothing here is fatal to a session.
#[derive(Error, Debug)]
pub enum TreeError {
    /// Node already exists
    #[error("Node '{0}' already exists")]
    NodeAlreadyExists(String),

    /// Node not found by identifier
    #[error("Node '{0}' not found")]
    NodeNotFound(String),

    /// A node may have at most one parent
    #[error("Node '{node}' already has parent '{parent}'")]
    DuplicateParent {
        /// Child node identifier
        node: String,
        /// Existing parent identifier
        parent: String,
    },

    /// The root never gains an incoming edge
    #[error("Cannot attach '{0}' as a parent of the root node")]
    RootReparent(String),

    /// Connecting these nodes would close a cycle
    #[error("Edge {from} -> {to} would create a cycle")]
    CycleDetected {
        /// Source node identifier
        from: String,
        /// Target node identifier
        to: String,
    },

    /// Sibling creation is meaningless for the root
    #[error("Cannot add a sibling to the root product")]
    RootSibling,

    /// The node has no incoming edge, so its parent cannot be resolved
    #[error("Node '{0}' is detached from the tree")]
    NodeDetached(String),
}

impl TreeError {
    /// True for rejections of internal invariant violations, which callers
    /// treat as no-ops rather than user-facing failures.
    pub fn is_invariant_rejection(&self) -> bool {
        matches!(
            self,
            TreeError::NodeAlreadyExists(_)
                | TreeError::DuplicateParent { .. }
                | TreeError::RootReparent(_)
                | TreeError::CycleDetected { .. }
        )
    }
}

/// Persistence collaborator errors.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Stored record is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Prompt generation collaborator errors. These must surface to the user;
/// the in-memory tree stays untouched.
#[derive(Error, Debug)]
pub enum PromptError {
    #[error("Prompt template failed to render: {0}")]
    Render(#[from] handlebars::RenderError),

    #[error("Prompt generator is not configured: {0}")]
    MissingConfiguration(String),
}
