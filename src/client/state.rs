//! Module `state`
//!
//! Defines the `Session` struct: the per-connection state of a client,
//! namely who it acts as and where it is in the tree.

/// State of one connected session.
///
/// The user name is taken at face value; there is no authentication beyond
/// it. Paths given by the client are resolved against `current_path`.
#[derive(Debug, Clone)]
pub struct Session {
    user: String,
    current_path: String,
}

impl Session {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            current_path: "/".to_string(),
        }
    }

    /// Turns a client path into an absolute one. `.` and `..` segments are
    /// folded; `..` at the root stays at the root.
    pub fn resolve(&self, path: &str) -> String {
        let joined = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("{}/{}", self.current_path, path)
        };

        let mut segments: Vec<&str> = Vec::new();
        for segment in joined.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    segments.pop();
                }
                name => segments.push(name),
            }
        }
        format!("/{}", segments.join("/"))
    }

    // --------------------
    // Getter methods
    // --------------------

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn current_path(&self) -> &str {
        &self.current_path
    }

    // --------------------
    // Setter methods
    // --------------------

    pub fn set_user(&mut self, user: String) {
        self.user = user;
    }

    pub fn set_current_path(&mut self, path: String) {
        self.current_path = path;
    }
}
