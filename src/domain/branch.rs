/// Represents the checked-out branch with release context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchContext {
    pub name: String,
    pub is_release: bool,
}

impl BranchContext {
    /// Create a branch context, matching `name` against the accepted release branches
    pub fn new<S: AsRef<str>>(name: impl Into<String>, release_branches: &[S]) -> Self {
        let name_str = name.into();
        let is_release = release_branches.iter().any(|b| b.as_ref() == name_str);

        BranchContext {
            name: name_str,
            is_release,
        }
    }

    /// A detached HEAD reports no branch name
    pub fn is_detached(&self) -> bool {
        self.name.is_empty()
    }

    /// Check if this is a release branch
    pub fn is_release_branch(&self) -> bool {
        self.is_release
    }
}
